use super::{DetectedFrame, FrameSource, JsonLinesSource};
use crate::config::SourceConfig;
use crate::error::{GesturecamError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{info, warn};

/// External hand detector streaming JSON frames on stdout.
///
/// The detector is started with its tuning flags appended to the configured
/// arguments and is killed when this value is dropped.
pub struct DetectorProcess {
    child: Child,
    frames: JsonLinesSource<BufReader<ChildStdout>>,
}

impl DetectorProcess {
    /// Arguments passed to the detector, configured ones first
    pub fn detector_args(config: &SourceConfig) -> Vec<String> {
        let mut args = config.args.clone();
        args.extend([
            "--max-hands".to_string(),
            config.max_hands.to_string(),
            "--detection-confidence".to_string(),
            config.detection_confidence.to_string(),
            "--tracking-confidence".to_string(),
            config.tracking_confidence.to_string(),
            "--model-complexity".to_string(),
            config.model_complexity.to_string(),
        ]);
        args
    }

    pub fn spawn(config: &SourceConfig) -> Result<Self> {
        let args = Self::detector_args(config);
        info!("Spawning detector: {} {}", config.command, args.join(" "));

        let mut child = Command::new(&config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GesturecamError::frame_source(format!(
                    "Failed to start detector '{}': {}",
                    config.command, e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GesturecamError::frame_source("Detector stdout not captured"))?;

        Ok(Self {
            child,
            frames: JsonLinesSource::new(BufReader::new(stdout), config.command.clone()),
        })
    }
}

#[async_trait]
impl FrameSource for DetectorProcess {
    async fn next_frame(&mut self) -> Result<Option<DetectedFrame>> {
        let frame = self.frames.next_frame().await?;

        if frame.is_none() {
            match self.child.wait().await {
                Ok(status) if status.success() => info!("Detector exited"),
                Ok(status) => warn!("Detector exited with {}", status),
                Err(e) => warn!("Failed to reap detector process: {}", e),
            }
        }

        Ok(frame)
    }

    fn name(&self) -> &str {
        self.frames.name()
    }
}
