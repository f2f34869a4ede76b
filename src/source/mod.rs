//! Landmark frames from an external hand detector.
//!
//! Detection itself happens outside this crate. A source yields, per video
//! frame, every detected hand as an ordered list of 21 normalized points.

mod detector;
mod jsonl;
mod mock;

#[cfg(test)]
mod tests;

pub use detector::DetectorProcess;
pub use jsonl::JsonLinesSource;
pub use mock::MockFrameSource;

use crate::config::{SourceConfig, SourceKind};
use crate::error::Result;
use crate::landmarks::{HandLandmarks, Point2};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Detector output for one video frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedFrame {
    /// Hands in detector order, each a list of normalized landmark points
    #[serde(default)]
    pub hands: Vec<Vec<Point2>>,

    /// Frame width in pixels, if the detector reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Frame height in pixels, if the detector reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl DetectedFrame {
    pub fn no_hands() -> Self {
        Self::default()
    }

    pub fn with_hand(points: Vec<Point2>) -> Self {
        Self {
            hands: vec![points],
            ..Self::default()
        }
    }

    /// Frame size, falling back to `default_size` for missing dimensions
    pub fn frame_size(&self, default_size: (u32, u32)) -> (u32, u32) {
        (
            self.width.unwrap_or(default_size.0),
            self.height.unwrap_or(default_size.1),
        )
    }

    /// Landmarks of hand `index`, empty when that hand was not detected
    pub fn hand(&self, index: usize, default_size: (u32, u32)) -> HandLandmarks {
        self.hands
            .get(index)
            .map(|points| HandLandmarks::from_points(points, self.frame_size(default_size)))
            .unwrap_or_default()
    }
}

/// Producer of detector frames; `Ok(None)` marks the end of the stream.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<DetectedFrame>>;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// Open the source described by the configuration
pub async fn open_source(config: &SourceConfig) -> Result<Box<dyn FrameSource>> {
    match config.kind {
        SourceKind::Replay => {
            info!("Replaying landmark frames from {}", config.path);
            Ok(Box::new(JsonLinesSource::open(&config.path).await?))
        }
        SourceKind::Detector => {
            info!("Starting hand detector: {}", config.command);
            Ok(Box::new(DetectorProcess::spawn(config)?))
        }
    }
}
