mod controller;
mod features;
mod gesture;
mod tracker;


pub use controller::GestureController;
pub use features::{FeatureExtractor, FingerFeatures, FrameSkip};
pub use gesture::{gesture_name, Command, Device, FingerSet, Gesture, UnknownCommand};
pub use tracker::{CommandChange, FrameOutcome, GestureTracker, SessionState, TrackerStats};
