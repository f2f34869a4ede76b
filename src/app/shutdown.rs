use super::{GesturecamOrchestrator, ShutdownReason};
use crate::error::{GesturecamError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

impl GesturecamOrchestrator {
    /// Stop background tasks and close the broker connection
    pub(super) async fn shutdown(&mut self, reason: &ShutdownReason) -> Result<i32> {
        info!("Beginning graceful shutdown");

        // Stops the signal handlers
        self.cancellation_token.cancel();

        let mut exit_code = reason.exit_code();

        if let Some(keyboard_handler) = &self.keyboard_handler {
            if let Err(e) = stop_with_timeout("keyboard", keyboard_handler.stop()).await {
                error!("Error stopping keyboard: {}", e);
                exit_code = 1;
            }
        }

        let publisher = self.controller.publisher_mut();
        if let Err(e) = stop_with_timeout("publisher", publisher.close()).await {
            error!("Error closing publisher: {}", e);
            exit_code = 1;
        }

        let stats = self.controller.tracker().stats();
        info!(
            frames = self.frames_processed,
            skipped = stats.frames_skipped,
            gestures = stats.gestures_recognized,
            commands = stats.commands_emitted,
            publish_failures = self.controller.publish_failures(),
            "Session summary"
        );

        info!("Graceful shutdown completed with exit code: {}", exit_code);
        Ok(exit_code)
    }
}

const STOP_TIMEOUT: Duration = Duration::from_secs(5);

async fn stop_with_timeout(
    component: &str,
    stop: impl Future<Output = Result<()>>,
) -> Result<()> {
    info!("Stopping {} component", component);

    match timeout(STOP_TIMEOUT, stop).await {
        Ok(Ok(())) => {
            info!("{} component stopped", component);
            Ok(())
        }
        Ok(Err(e)) => {
            error!("Error stopping {} component: {}", component, e);
            Err(e)
        }
        Err(_) => {
            error!("{} component stop timeout", component);
            Err(GesturecamError::component(
                component.to_string(),
                "stop timed out".to_string(),
            ))
        }
    }
}
