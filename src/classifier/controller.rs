use super::tracker::{CommandChange, FrameOutcome, GestureTracker};
use crate::config::ThresholdConfig;
use crate::landmarks::HandLandmarks;
use crate::publisher::CommandPublisher;
use tracing::{info, warn};

/// Tracker plus the channel its commands go out on.
///
/// This is the per-frame entry point for a capture loop.
pub struct GestureController<P: CommandPublisher> {
    tracker: GestureTracker,
    publisher: P,
    topic: String,
    publish_failures: u64,
}

impl<P: CommandPublisher> GestureController<P> {
    pub fn new(thresholds: ThresholdConfig, publisher: P, topic: impl Into<String>) -> Self {
        Self {
            tracker: GestureTracker::new(thresholds),
            publisher,
            topic: topic.into(),
            publish_failures: 0,
        }
    }

    /// Classify one frame and publish the command if it changed.
    ///
    /// Returns the change that was emitted, if any. A failed publish is logged
    /// and not retried; the command still counts as emitted.
    pub fn process_frame(&mut self, hand: &HandLandmarks) -> Option<CommandChange> {
        self.process_frame_detailed(hand).change()
    }

    /// Like [`process_frame`](Self::process_frame) but returns the full outcome
    pub fn process_frame_detailed(&mut self, hand: &HandLandmarks) -> FrameOutcome {
        let outcome = self.tracker.update(hand);

        if let Some(change) = outcome.change() {
            info!(
                "{}: {} -> {}",
                change.command.action(),
                change.gesture,
                change.command
            );

            if let Err(e) = self.publisher.publish(&self.topic, change.command.name()) {
                self.publish_failures += 1;
                warn!("Failed to send {} to {}: {}", change.command, self.topic, e);
            }
        }

        outcome
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut GestureTracker {
        &mut self.tracker
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn publish_failures(&self) -> u64 {
        self.publish_failures
    }
}
