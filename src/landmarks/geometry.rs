use serde::{Deserialize, Serialize};

/// Decimal places kept by [`dist_between`]
pub const DISTANCE_DECIMALS: i32 = 6;

/// A 2D point or vector in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `self` to `other`
    pub fn to(self, other: Point2) -> Point2 {
        Point2::new(other.x - self.x, other.y - self.y)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Round `value` to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Euclidean distance rounded to [`DISTANCE_DECIMALS`] places
pub fn dist_between(a: Point2, b: Point2) -> f64 {
    round_to(a.to(b).length(), DISTANCE_DECIMALS)
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `None` when either vector has zero length and so no direction.
pub fn angle_between(u: Point2, v: Point2) -> Option<f64> {
    if u.length() == 0.0 || v.length() == 0.0 {
        return None;
    }

    let cross = u.x * v.y - u.y * v.x;
    let dot = u.x * v.x + u.y * v.y;
    Some(cross.abs().atan2(dot).to_degrees())
}
