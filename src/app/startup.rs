use super::{GesturecamOrchestrator, RunOptions};
use crate::config::{GesturecamConfig, MqttConfig};
use crate::error::Result;
use crate::publisher::{CommandPublisher, LogPublisher};
use crate::source::open_source;
use std::io::IsTerminal;
use tracing::{error, info};

impl GesturecamOrchestrator {
    /// Open the configured source and broker connection
    pub async fn from_config(config: GesturecamConfig, options: RunOptions) -> Result<Self> {
        info!("Initializing gesturecam components");

        let source = open_source(&config.source).await.map_err(|e| {
            error!("Failed to open frame source: {}", e);
            e
        })?;

        let publisher = build_publisher(&config.mqtt, options.no_publish)?;

        Ok(Self::new(config, source, publisher))
    }

    /// Start the optional keyboard listener
    pub(super) async fn start_keyboard(&mut self) -> Result<()> {
        let Some(keyboard_handler) = &self.keyboard_handler else {
            return Ok(());
        };

        if !std::io::stdin().is_terminal() {
            info!("stdin is not a terminal, keyboard quit disabled");
            self.keyboard_handler = None;
            return Ok(());
        }

        keyboard_handler.start().await
    }
}

#[cfg(feature = "mqtt")]
fn build_publisher(config: &MqttConfig, no_publish: bool) -> Result<Box<dyn CommandPublisher>> {
    if no_publish {
        info!("Publishing disabled, commands will only be logged");
        return Ok(Box::new(LogPublisher));
    }

    Ok(Box::new(crate::publisher::MqttPublisher::connect(config)?))
}

#[cfg(not(feature = "mqtt"))]
fn build_publisher(config: &MqttConfig, no_publish: bool) -> Result<Box<dyn CommandPublisher>> {
    if !no_publish {
        tracing::warn!(
            "Built without MQTT support, commands for {} will only be logged",
            config.topic
        );
    }
    Ok(Box::new(LogPublisher))
}
