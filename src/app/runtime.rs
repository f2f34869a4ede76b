use super::{GesturecamOrchestrator, RunOutcome, ShutdownReason};
use crate::classifier::FrameOutcome;
use crate::error::{EventBusError, GesturecamError, Result};
use crate::events::{EventFilter, EventReceiver, GestureEvent};
use crate::source::DetectedFrame;
use std::time::SystemTime;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

impl GesturecamOrchestrator {
    /// Run the frame loop until the source ends or shutdown is requested,
    /// then shut down and report why and with which exit code
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let mut source = self
            .source
            .take()
            .ok_or_else(|| GesturecamError::system("Frame source already consumed"))?;

        let mut shutdown_receiver =
            self.shutdown_receiver
                .take()
                .ok_or_else(|| GesturecamError::System {
                    message: "Shutdown receiver already taken".to_string(),
                })?;

        setup_signal_handlers(self.shutdown_sender.clone(), self.cancellation_token.clone());
        let mut shutdown_events = EventReceiver::new(
            &self.event_bus,
            EventFilter::EventTypes(vec!["shutdown_requested"]),
            "orchestrator",
        );

        self.start_keyboard().await?;
        info!("Gesturecam is running, reading frames from {}", source.name());

        let reason = loop {
            tokio::select! {
                Some(reason) = shutdown_receiver.recv() => break reason,
                event = shutdown_events.recv() => match event {
                    Ok(GestureEvent::ShutdownRequested { .. }) => break ShutdownReason::UserRequest,
                    Ok(_) | Err(EventBusError::Lagged(_)) => continue,
                    Err(e) => break ShutdownReason::Error(e.to_string()),
                },
                frame = source.next_frame() => match frame {
                    Ok(Some(frame)) => {
                        self.handle_frame(&frame);
                    }
                    Ok(None) => {
                        self.event_bus.publish(GestureEvent::SourceEnded {
                            frames: self.frames_processed,
                        });
                        break ShutdownReason::EndOfStream;
                    }
                    Err(e) => {
                        self.event_bus.publish(GestureEvent::SystemError {
                            component: source.name().to_string(),
                            error: e.to_string(),
                        });
                        break ShutdownReason::Error(e.to_string());
                    }
                },
            }
        };

        info!("Shutdown initiated: {}", reason);
        drop(source);

        let exit_code = self.shutdown(&reason).await?;
        info!("Gesturecam shutdown complete (exit code {})", exit_code);
        Ok(RunOutcome { reason, exit_code })
    }

    /// Classify one detector frame and announce the result on the event bus
    pub fn handle_frame(&mut self, frame: &DetectedFrame) -> FrameOutcome {
        self.frames_processed += 1;

        let hand = frame.hand(
            self.config.source.hand_index,
            self.config.frame.resolution,
        );
        let outcome = self.controller.process_frame_detailed(&hand);

        self.event_bus.publish(GestureEvent::FrameProcessed {
            frame_id: self.frames_processed,
            gesture: outcome.gesture(),
            timestamp: SystemTime::now(),
        });

        if let Some(change) = outcome.change() {
            self.event_bus.publish(GestureEvent::CommandEmitted {
                command: change.command,
                gesture: change.gesture,
                timestamp: SystemTime::now(),
            });
        }

        outcome
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(
    shutdown_sender: mpsc::Sender<ShutdownReason>,
    cancellation_token: CancellationToken,
) {
    // Handle SIGTERM (systemd stop) - Unix only
    #[cfg(unix)]
    {
        let shutdown_sender = shutdown_sender.clone();
        let cancellation_token = cancellation_token.clone();
        tokio::spawn(async move {
            let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!("Failed to register SIGTERM handler: {}", e);
                    return;
                }
            };

            tokio::select! {
                _ = cancellation_token.cancelled() => {}
                Some(()) = sigterm.recv() => {
                    info!("Received SIGTERM signal");
                    let _ = shutdown_sender
                        .send(ShutdownReason::Signal("SIGTERM".to_string()))
                        .await;
                }
            }
        });
    }

    // Handle SIGINT (Ctrl+C) - Cross-platform
    tokio::spawn(async move {
        tokio::select! {
            _ = cancellation_token.cancelled() => {}
            result = signal::ctrl_c() => match result {
                Ok(()) => {
                    info!("Received SIGINT signal (Ctrl+C)");
                    let _ = shutdown_sender
                        .send(ShutdownReason::Signal("SIGINT".to_string()))
                        .await;
                }
                Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
            },
        }
        debug!("Signal handler exited");
    });
}
