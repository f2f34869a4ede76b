use super::{DetectedFrame, FrameSource};
use crate::error::{GesturecamError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

/// Reads one JSON-encoded [`DetectedFrame`] per line.
///
/// Blank lines are ignored. Malformed lines are logged and skipped.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_number: u64,
    name: String,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            name: name.into(),
        }
    }

    /// Lines consumed so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a replay file
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            GesturecamError::frame_source(format!(
                "Failed to open replay file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> FrameSource for JsonLinesSource<R> {
    async fn next_frame(&mut self) -> Result<Option<DetectedFrame>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<DetectedFrame>(line) {
                Ok(frame) => {
                    debug!(
                        "{}:{} {} hand(s)",
                        self.name,
                        self.line_number,
                        frame.hands.len()
                    );
                    return Ok(Some(frame));
                }
                Err(e) => {
                    warn!(
                        "Skipping malformed frame at {}:{}: {}",
                        self.name, self.line_number, e
                    );
                }
            }
        }

        debug!("{} reached end of stream", self.name);
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
