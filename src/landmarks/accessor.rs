use super::geometry::{dist_between, Point2};
use super::ids;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The five fingers, declared in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers in canonical order
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Landmark identity of the fingertip
    pub const fn tip(self) -> usize {
        match self {
            Finger::Thumb => ids::THUMB_TIP,
            Finger::Index => ids::INDEX_TIP,
            Finger::Middle => ids::MIDDLE_TIP,
            Finger::Ring => ids::RING_TIP,
            Finger::Pinky => ids::PINKY_TIP,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of one landmark in both pixel and normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkPosition {
    pub pixel_x: i32,
    pub pixel_y: i32,
    pub x: f64,
    pub y: f64,
}

impl LandmarkPosition {
    pub fn normalized(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Landmarks of the tracked hand for a single frame, addressed by identity.
///
/// An empty value means no hand was detected in the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    positions: [Option<LandmarkPosition>; ids::LANDMARK_COUNT],
}

impl Default for HandLandmarks {
    fn default() -> Self {
        Self::empty()
    }
}

impl HandLandmarks {
    /// No hand in this frame
    pub fn empty() -> Self {
        Self {
            positions: [None; ids::LANDMARK_COUNT],
        }
    }

    /// Build the identity mapping from detector output for one hand.
    ///
    /// `points[i]` is the normalized position of landmark `i`. Pixel positions
    /// are truncated towards zero against `frame_size` (width, height).
    pub fn from_points(points: &[Point2], frame_size: (u32, u32)) -> Self {
        let (width, height) = frame_size;
        let mut positions = [None; ids::LANDMARK_COUNT];

        if points.len() > ids::LANDMARK_COUNT {
            debug!(
                "Ignoring {} landmarks beyond the expected {}",
                points.len() - ids::LANDMARK_COUNT,
                ids::LANDMARK_COUNT
            );
        }

        for (slot, point) in positions.iter_mut().zip(points) {
            *slot = Some(LandmarkPosition {
                pixel_x: (point.x * width as f64) as i32,
                pixel_y: (point.y * height as f64) as i32,
                x: point.x,
                y: point.y,
            });
        }

        Self { positions }
    }

    pub fn get(&self, id: usize) -> Option<&LandmarkPosition> {
        self.positions.get(id).and_then(Option::as_ref)
    }

    pub fn normalized(&self, id: usize) -> Option<Point2> {
        self.get(id).map(LandmarkPosition::normalized)
    }

    pub fn pixel(&self, id: usize) -> Option<(i32, i32)> {
        self.get(id).map(|p| (p.pixel_x, p.pixel_y))
    }

    /// Number of landmarks present
    pub fn len(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.iter().all(Option::is_none)
    }

    /// Iterate `(identity, position)` for every landmark present
    pub fn iter(&self) -> impl Iterator<Item = (usize, &LandmarkPosition)> {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(id, p)| p.as_ref().map(|p| (id, p)))
    }

    /// Scale reference: distance between the wrist and the first thumb joint.
    ///
    /// `None` when either landmark is missing. A zero distance is returned as
    /// is; callers decide whether it is usable.
    pub fn reference_distance(&self) -> Option<f64> {
        let root = self.normalized(ids::ROOT)?;
        let joint = self.normalized(ids::REFERENCE_JOINT)?;
        Some(dist_between(root, joint))
    }

    /// Rounded distance from the wrist to landmark `id`
    pub fn distance_from_root(&self, id: usize) -> Option<f64> {
        let root = self.normalized(ids::ROOT)?;
        let target = self.normalized(id)?;
        Some(dist_between(root, target))
    }
}
