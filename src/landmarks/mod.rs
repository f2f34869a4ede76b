mod accessor;
pub mod geometry;
pub mod ids;


pub use accessor::{Finger, HandLandmarks, LandmarkPosition};
pub use geometry::{angle_between, dist_between, Point2};
