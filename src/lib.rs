pub mod app;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod landmarks;
pub mod publisher;
pub mod source;

pub use app::{GesturecamOrchestrator, RunOptions, RunOutcome, ShutdownReason};
pub use classifier::{
    gesture_name, Command, Device, FeatureExtractor, FingerSet, FrameOutcome, FrameSkip, Gesture,
    GestureController, GestureTracker, SessionState,
};
pub use config::GesturecamConfig;
pub use error::{GesturecamError, Result};
pub use events::{EventBus, EventFilter, EventReceiver, GestureEvent};
pub use landmarks::{Finger, HandLandmarks, Point2};
pub use publisher::{CommandPublisher, LogPublisher, RecordingPublisher};
pub use source::{open_source, DetectedFrame, FrameSource, MockFrameSource};
