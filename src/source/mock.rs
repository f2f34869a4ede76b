use super::{DetectedFrame, FrameSource};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

/// Scripted frame source for tests and demos
pub struct MockFrameSource {
    frames: VecDeque<DetectedFrame>,
    frame_interval: Option<Duration>,
    /// Keep yielding empty frames instead of ending
    endless: bool,
}

impl MockFrameSource {
    pub fn new(frames: impl IntoIterator<Item = DetectedFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            frame_interval: None,
            endless: false,
        }
    }

    /// Source that never ends, yielding frames without hands at `interval`
    pub fn endless(interval: Duration) -> Self {
        Self {
            frames: VecDeque::new(),
            frame_interval: Some(interval),
            endless: true,
        }
    }

    /// Delay each frame, like a camera running at a fixed rate
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl FrameSource for MockFrameSource {
    async fn next_frame(&mut self) -> Result<Option<DetectedFrame>> {
        if let Some(interval) = self.frame_interval {
            tokio::time::sleep(interval).await;
        }

        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None if self.endless => Ok(Some(DetectedFrame::no_hands())),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
