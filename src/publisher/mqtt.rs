use super::CommandPublisher;
use crate::config::MqttConfig;
use crate::error::{GesturecamError, Result};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outstanding requests rumqttc may queue before `try_publish` fails
const REQUEST_CAPACITY: usize = 16;

/// Pause after a connection error before polling again
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// How long `close` waits for the disconnect to go out
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Build client options for a broker, with a per-run unique client id
pub fn mqtt_options(config: &MqttConfig) -> MqttOptions {
    let client_id = format!("{}-{}", config.client_id_prefix, uuid::Uuid::new_v4());
    let mut options = MqttOptions::new(client_id, config.broker.clone(), config.port);
    options.set_keep_alive(Duration::from_secs(config.keep_alive_seconds));
    options.set_clean_session(true);
    options
}

/// Publishes command names to an MQTT broker at QoS 0.
///
/// `publish` only enqueues; a background task owns the connection.
pub struct MqttPublisher {
    client: AsyncClient,
    event_loop_task: Option<JoinHandle<()>>,
    cancellation_token: CancellationToken,
}

impl MqttPublisher {
    /// Start the connection task. Must be called inside a tokio runtime.
    pub fn connect(config: &MqttConfig) -> Result<Self> {
        info!(
            "Connecting to MQTT broker {}:{} (topic {})",
            config.broker, config.port, config.topic
        );

        let (client, event_loop) = AsyncClient::new(mqtt_options(config), REQUEST_CAPACITY);
        let cancellation_token = CancellationToken::new();
        let event_loop_task = tokio::spawn(drive_event_loop(
            event_loop,
            cancellation_token.clone(),
        ));

        Ok(Self {
            client,
            event_loop_task: Some(event_loop_task),
            cancellation_token,
        })
    }

    /// Wait for the connection task to finish after `close`
    pub async fn wait_closed(&mut self, timeout: Duration) {
        if let Some(task) = self.event_loop_task.take() {
            if tokio::time::timeout(timeout, task).await.is_err() {
                warn!("MQTT connection did not close in time, abandoning it");
                self.cancellation_token.cancel();
            }
        }
    }
}

#[async_trait]
impl CommandPublisher for MqttPublisher {
    fn publish(&mut self, topic: &str, message: &str) -> Result<()> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, message.as_bytes().to_vec())
            .map_err(|e| GesturecamError::publish(format!("MQTT publish failed: {}", e)))?;
        debug!("Queued MQTT publish {} <- {}", topic, message);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        info!("Disconnecting from MQTT broker");
        if let Err(e) = self.client.try_disconnect() {
            // Request queue is gone or full; stop the task directly
            warn!("MQTT disconnect request failed: {}", e);
            self.cancellation_token.cancel();
        }
        self.wait_closed(CLOSE_TIMEOUT).await;
        Ok(())
    }
}

impl Drop for MqttPublisher {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

async fn drive_event_loop(mut event_loop: EventLoop, cancellation_token: CancellationToken) {
    let mut connected = false;

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                debug!("MQTT event loop cancelled");
                break;
            }
            event = event_loop.poll() => {
                match event {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("Connected to MQTT broker");
                        connected = true;
                    }
                    Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                        debug!("MQTT disconnect sent");
                        break;
                    }
                    Ok(event) => {
                        debug!("MQTT event: {:?}", event);
                    }
                    Err(e) => {
                        if connected {
                            warn!("MQTT connection lost: {}", e);
                            connected = false;
                        } else {
                            warn!("MQTT connection error: {}", e);
                        }
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        }
    }

    debug!("MQTT event loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ids_are_unique() {
        let config = MqttConfig::default();
        let first = mqtt_options(&config);
        let second = mqtt_options(&config);

        assert!(first.client_id().starts_with("gesturecam-"));
        assert_ne!(first.client_id(), second.client_id());
        assert_eq!(first.broker_address(), ("broker.hivemq.com".to_string(), 1883));
        assert_eq!(first.keep_alive(), Duration::from_secs(60));
    }
}
