use super::features::{FeatureExtractor, FrameSkip};
use super::gesture::{Command, FingerSet, Gesture};
use crate::config::ThresholdConfig;
use crate::landmarks::HandLandmarks;
use serde::Serialize;
use tracing::debug;

/// Command state carried from one frame to the next.
///
/// `None` is the "nothing recognized yet" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub current_command: Option<Command>,
    pub previous_emitted_command: Option<Command>,
}

/// A newly emitted command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandChange {
    pub command: Command,
    pub previous: Option<Command>,
    pub gesture: Gesture,
}

/// Result of feeding one frame to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Landmarks unusable, state untouched
    Skipped(FrameSkip),
    /// Fingers classified; `change` is set when a command must be emitted
    Classified {
        fingers: FingerSet,
        gesture: Option<Gesture>,
        change: Option<CommandChange>,
    },
}

impl FrameOutcome {
    pub fn change(&self) -> Option<CommandChange> {
        match self {
            FrameOutcome::Classified { change, .. } => *change,
            FrameOutcome::Skipped(_) => None,
        }
    }

    pub fn gesture(&self) -> Option<Gesture> {
        match self {
            FrameOutcome::Classified { gesture, .. } => *gesture,
            FrameOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub frames_seen: u64,
    pub frames_skipped: u64,
    pub gestures_recognized: u64,
    pub commands_emitted: u64,
}

/// Classifies frames and edge-triggers commands
#[derive(Debug, Clone)]
pub struct GestureTracker {
    extractor: FeatureExtractor,
    state: SessionState,
    stats: TrackerStats,
}

impl GestureTracker {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            extractor: FeatureExtractor::new(thresholds),
            state: SessionState::default(),
            stats: TrackerStats::default(),
        }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Finger-up set and gesture for a frame without touching session state
    pub fn classify(
        &self,
        hand: &HandLandmarks,
    ) -> Result<(FingerSet, Option<Gesture>), FrameSkip> {
        let fingers = self.extractor.fingers_up(hand)?;
        Ok((fingers, Gesture::from_fingers(fingers)))
    }

    /// Classify a frame and update the command state.
    ///
    /// A change is reported only when the resulting command differs from the
    /// last one emitted; the caller is expected to deliver it.
    pub fn update(&mut self, hand: &HandLandmarks) -> FrameOutcome {
        self.stats.frames_seen += 1;

        let (fingers, gesture) = match self.classify(hand) {
            Ok(classified) => classified,
            Err(skip) => {
                self.stats.frames_skipped += 1;
                debug!("Skipping frame: {}", skip);
                return FrameOutcome::Skipped(skip);
            }
        };

        let command = gesture.and_then(Gesture::command);
        match (gesture, command) {
            (Some(gesture), Some(command)) => {
                debug!("{} -> {} ({})", gesture, command, command.action());
                self.state.current_command = Some(command);
            }
            (Some(gesture), None) => debug!("Gesture {} has no command", gesture),
            (None, _) => debug!("No gesture for fingers {}", fingers),
        }
        if gesture.is_some() {
            self.stats.gestures_recognized += 1;
        }

        let change = match (gesture, self.state.current_command) {
            (Some(gesture), Some(command))
                if command.gesture() == gesture
                    && self.state.previous_emitted_command != Some(command) =>
            {
                let previous = self.state.previous_emitted_command;
                self.state.previous_emitted_command = Some(command);
                self.stats.commands_emitted += 1;
                Some(CommandChange {
                    command,
                    previous,
                    gesture,
                })
            }
            _ => None,
        };

        FrameOutcome::Classified {
            fingers,
            gesture,
            change,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_command(&self) -> Option<Command> {
        self.state.current_command
    }

    pub fn previous_emitted_command(&self) -> Option<Command> {
        self.state.previous_emitted_command
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Forget all commands, as if no gesture had ever been seen
    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }
}
