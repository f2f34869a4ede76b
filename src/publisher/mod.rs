//! Delivery of command names to remote actuators.

mod mock;
#[cfg(feature = "mqtt")]
mod mqtt;

pub use mock::RecordingPublisher;
#[cfg(feature = "mqtt")]
pub use mqtt::{mqtt_options, MqttPublisher};

use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Fire-and-forget outbound channel for command names.
///
/// Implementations must not block the frame loop and must not retry; a
/// failed send is reported once and forgotten.
#[async_trait]
pub trait CommandPublisher: Send {
    fn publish(&mut self, topic: &str, message: &str) -> Result<()>;

    /// Flush and disconnect, if the transport needs it
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<P: CommandPublisher + ?Sized> CommandPublisher for Box<P> {
    fn publish(&mut self, topic: &str, message: &str) -> Result<()> {
        (**self).publish(topic, message)
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

/// Logs commands instead of sending them
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl CommandPublisher for LogPublisher {
    fn publish(&mut self, topic: &str, message: &str) -> Result<()> {
        info!("[dry publish] {} <- {}", topic, message);
        Ok(())
    }
}
