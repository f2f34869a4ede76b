use super::gesture::FingerSet;
use crate::config::ThresholdConfig;
use crate::landmarks::geometry::angle_between;
use crate::landmarks::{ids, Finger, HandLandmarks, Point2};
use std::fmt;

/// Why a frame produced no finger-up set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSkip {
    /// No hand, or a landmark needed for classification is absent
    MissingLandmarkData,
    /// Wrist to thumb-CMC distance is missing or zero
    UndefinedReferenceFrame,
    /// Coincident thumb joints or non-finite coordinates
    DegenerateGeometry,
}

impl fmt::Display for FrameSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FrameSkip::MissingLandmarkData => "missing landmark data",
            FrameSkip::UndefinedReferenceFrame => "undefined reference frame",
            FrameSkip::DegenerateGeometry => "degenerate hand geometry",
        };
        f.write_str(reason)
    }
}

/// Per-finger extension signals for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerFeatures {
    /// Wrist to thumb-CMC distance
    pub reference: f64,
    /// Cumulative thumb bend in degrees
    pub thumb_bend: f64,
    /// Tip distance over reference for index, middle, ring, pinky
    pub ratios: [f64; 4],
}

/// Turns landmarks into per-finger up/down decisions.
///
/// Holds no state between frames: the same landmarks always give the same
/// answer.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    thresholds: ThresholdConfig,
}

impl FeatureExtractor {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Minimum tip ratio for a finger to count as up. The thumb is angle based.
    pub fn ratio_threshold(&self, finger: Finger) -> Option<f64> {
        match finger {
            Finger::Thumb => None,
            Finger::Index => Some(self.thresholds.index),
            Finger::Middle => Some(self.thresholds.middle),
            Finger::Ring => Some(self.thresholds.ring),
            Finger::Pinky => Some(self.thresholds.pinky),
        }
    }

    /// Usable scale reference for the frame
    pub fn reference_frame(&self, hand: &HandLandmarks) -> Result<f64, FrameSkip> {
        if hand.is_empty() {
            return Err(FrameSkip::MissingLandmarkData);
        }

        match hand.reference_distance() {
            Some(reference) if reference.is_finite() && reference > 0.0 => Ok(reference),
            _ => Err(FrameSkip::UndefinedReferenceFrame),
        }
    }

    /// Fingertip distance from the wrist divided by the reference distance
    pub fn finger_ratio(
        &self,
        hand: &HandLandmarks,
        reference: f64,
        finger: Finger,
    ) -> Result<f64, FrameSkip> {
        let distance = hand
            .distance_from_root(finger.tip())
            .ok_or(FrameSkip::MissingLandmarkData)?;

        if !distance.is_finite() {
            return Err(FrameSkip::DegenerateGeometry);
        }

        Ok(distance / reference)
    }

    /// Sum of the unsigned angles between consecutive thumb segments, in
    /// degrees. A straight thumb measures zero.
    pub fn thumb_bend(&self, hand: &HandLandmarks) -> Result<f64, FrameSkip> {
        let mut joints = [Point2::default(); ids::THUMB_CHAIN.len()];
        for (slot, id) in joints.iter_mut().zip(ids::THUMB_CHAIN) {
            let point = hand.normalized(id).ok_or(FrameSkip::MissingLandmarkData)?;
            if !point.is_finite() {
                return Err(FrameSkip::DegenerateGeometry);
            }
            *slot = point;
        }

        let segments: Vec<Point2> = joints.windows(2).map(|w| w[0].to(w[1])).collect();

        segments.windows(2).try_fold(0.0, |total, pair| {
            angle_between(pair[0], pair[1])
                .map(|angle| total + angle)
                .ok_or(FrameSkip::DegenerateGeometry)
        })
    }

    /// Measure every finger signal for the frame
    pub fn extract(&self, hand: &HandLandmarks) -> Result<FingerFeatures, FrameSkip> {
        let reference = self.reference_frame(hand)?;
        let thumb_bend = self.thumb_bend(hand)?;

        let mut ratios = [0.0; 4];
        for (slot, finger) in ratios.iter_mut().zip(&Finger::ALL[1..]) {
            *slot = self.finger_ratio(hand, reference, *finger)?;
        }

        Ok(FingerFeatures {
            reference,
            thumb_bend,
            ratios,
        })
    }

    /// Threshold the measured signals into a finger-up set
    pub fn fingers_up_from(&self, features: &FingerFeatures) -> FingerSet {
        let mut set = FingerSet::EMPTY;

        if features.thumb_bend < self.thresholds.thumb_angle_degrees {
            set.insert(Finger::Thumb);
        }

        for (ratio, finger) in features.ratios.iter().zip(&Finger::ALL[1..]) {
            if let Some(threshold) = self.ratio_threshold(*finger) {
                if *ratio >= threshold {
                    set.insert(*finger);
                }
            }
        }

        set
    }

    /// Fingers judged up this frame, or why the frame cannot be classified.
    ///
    /// Either every finger is decided or none is; a frame is never
    /// classified from a partial set.
    pub fn fingers_up(&self, hand: &HandLandmarks) -> Result<FingerSet, FrameSkip> {
        let features = self.extract(hand)?;
        Ok(self.fingers_up_from(&features))
    }

    /// Up/down decision for one finger
    pub fn is_finger_up(&self, hand: &HandLandmarks, finger: Finger) -> Result<bool, FrameSkip> {
        let reference = self.reference_frame(hand)?;
        match self.ratio_threshold(finger) {
            Some(threshold) => Ok(self.finger_ratio(hand, reference, finger)? >= threshold),
            None => Ok(self.thumb_bend(hand)? < self.thresholds.thumb_angle_degrees),
        }
    }
}
