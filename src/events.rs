use crate::classifier::{Command, Gesture};
use crate::error::EventBusError;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events that can occur in the gesturecam system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GestureEvent {
    /// A frame went through classification
    FrameProcessed {
        frame_id: u64,
        gesture: Option<Gesture>,
        timestamp: SystemTime,
    },
    /// A new command was sent to the broker
    CommandEmitted {
        command: Command,
        gesture: Gesture,
        timestamp: SystemTime,
    },
    /// The frame source reached its end
    SourceEnded { frames: u64 },
    /// A system error occurred in a component
    SystemError { component: String, error: String },
    /// System shutdown requested
    ShutdownRequested {
        timestamp: SystemTime,
        reason: String,
    },
}

impl GestureEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            GestureEvent::FrameProcessed {
                frame_id, gesture, ..
            } => match gesture {
                Some(gesture) => format!("Frame {} classified as {}", frame_id, gesture),
                None => format!("Frame {} has no gesture", frame_id),
            },
            GestureEvent::CommandEmitted {
                command, gesture, ..
            } => {
                format!("Command {} emitted for {}", command, gesture)
            }
            GestureEvent::SourceEnded { frames } => {
                format!("Frame source ended after {} frames", frames)
            }
            GestureEvent::SystemError { component, error } => {
                format!("Error in {}: {}", component, error)
            }
            GestureEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            GestureEvent::FrameProcessed { .. } => "frame_processed",
            GestureEvent::CommandEmitted { .. } => "command_emitted",
            GestureEvent::SourceEnded { .. } => "source_ended",
            GestureEvent::SystemError { .. } => "system_error",
            GestureEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Event bus for component coordination using broadcast channels
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GestureEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<GestureEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns how many subscribers received it. Publishing with nobody
    /// listening is not an error.
    pub fn publish(&self, event: GestureEvent) -> usize {
        match &event {
            GestureEvent::SystemError { component, error } => {
                error!("System error in {}: {}", component, error);
            }
            GestureEvent::ShutdownRequested { reason, .. } => {
                info!("Shutdown requested: {}", reason);
            }
            _ => debug!("Event: {}", event.description()),
        }

        self.sender.send(event).unwrap_or(0)
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone)]
pub enum EventFilter {
    /// Accept all events
    All,
    /// Accept only specific event types
    EventTypes(Vec<&'static str>),
}

impl EventFilter {
    /// Check if an event passes this filter
    pub fn matches(&self, event: &GestureEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::EventTypes(types) => types.contains(&event.event_type()),
        }
    }
}

/// Event receiver with filtering
pub struct EventReceiver {
    receiver: broadcast::Receiver<GestureEvent>,
    filter: EventFilter,
    name: String,
}

impl EventReceiver {
    pub fn new(bus: &EventBus, filter: EventFilter, name: impl Into<String>) -> Self {
        Self {
            receiver: bus.subscribe(),
            filter,
            name: name.into(),
        }
    }

    /// Receive the next event that passes the filter
    pub async fn recv(&mut self) -> Result<GestureEvent, EventBusError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        debug!(
                            "Receiver '{}' received event: {}",
                            self.name,
                            event.description()
                        );
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Receiver '{}' lagged behind by {} events", self.name, n);
                    return Err(EventBusError::Lagged(n));
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed for receiver '{}'", self.name);
                    return Err(EventBusError::ChannelClosed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_event_bus_basic_operations() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();

        let delivered = event_bus.publish(GestureEvent::CommandEmitted {
            command: Command::GarageDoorOpen,
            gesture: Gesture::OnlyThumbUp,
            timestamp: SystemTime::now(),
        });
        assert_eq!(delivered, 1);

        match receiver.recv().await.unwrap() {
            GestureEvent::CommandEmitted { command, .. } => {
                assert_eq!(command, Command::GarageDoorOpen);
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let event_bus = EventBus::new(10);
        assert_eq!(event_bus.subscriber_count(), 0);
        assert_eq!(event_bus.publish(GestureEvent::SourceEnded { frames: 3 }), 0);
    }

    #[tokio::test]
    async fn test_filtered_receiver_skips_other_events() {
        let event_bus = EventBus::new(10);
        let mut receiver = EventReceiver::new(
            &event_bus,
            EventFilter::EventTypes(vec!["shutdown_requested"]),
            "test",
        );

        event_bus.publish(GestureEvent::FrameProcessed {
            frame_id: 1,
            gesture: Some(Gesture::Fist),
            timestamp: SystemTime::now(),
        });
        event_bus.publish(GestureEvent::ShutdownRequested {
            timestamp: SystemTime::now(),
            reason: "test".to_string(),
        });

        let event = timeout(Duration::from_millis(100), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event_type(), "shutdown_requested");
    }

    #[test]
    fn test_event_descriptions() {
        let event = GestureEvent::FrameProcessed {
            frame_id: 7,
            gesture: None,
            timestamp: SystemTime::now(),
        };
        assert_eq!(event.description(), "Frame 7 has no gesture");

        let event = GestureEvent::CommandEmitted {
            command: Command::BedroomLightOn,
            gesture: Gesture::OnlyIndexUp,
            timestamp: SystemTime::now(),
        };
        assert_eq!(event.description(), "Command BL_ON emitted for only-index-up");
        assert!(EventFilter::All.matches(&event));
    }
}
