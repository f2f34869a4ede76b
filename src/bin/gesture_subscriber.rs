use anyhow::Result;
use clap::Parser;
use gesturecam::publisher::mqtt_options;
use gesturecam::{Command, GesturecamConfig};
use rumqttc::{AsyncClient, Event, Packet, QoS};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Listens on the command topic and logs every command a gesturecam sends
#[derive(Parser, Debug)]
#[command(name = "gesture-subscriber")]
#[command(about = "Log the home automation commands published by gesturecam")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "gesturecam.toml")]
    config: String,

    /// Override the broker host
    #[arg(long)]
    broker: Option<String>,

    /// Override the broker port
    #[arg(long)]
    port: Option<u16>,

    /// Override the command topic
    #[arg(long)]
    topic: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(format!(
                        "gesture_subscriber={},gesturecam={}",
                        level, level
                    ))
                }),
        )
        .init();

    let mut config = GesturecamConfig::load_from_file(&args.config)?.mqtt;
    if let Some(broker) = args.broker {
        config.broker = broker;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(topic) = args.topic {
        config.topic = topic;
    }
    config.client_id_prefix = format!("{}-subscriber", config.client_id_prefix);

    let (client, mut event_loop) = AsyncClient::new(mqtt_options(&config), 10);
    info!(
        "Listening for commands on {} at {}:{}",
        config.topic, config.broker, config.port
    );

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Shutting down subscriber");
                let _ = client.disconnect().await;
                break;
            }
            event = event_loop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker");
                    // Subscriptions do not survive a reconnect with a clean session
                    client.subscribe(config.topic.clone(), QoS::AtMostOnce).await?;
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let payload = String::from_utf8_lossy(&publish.payload);
                    log_command(&publish.topic, payload.trim());
                }
                Ok(event) => debug!("MQTT event: {:?}", event),
                Err(e) => {
                    warn!("MQTT connection error: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            },
        }
    }

    Ok(())
}

fn log_command(topic: &str, payload: &str) {
    let received_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    match payload.parse::<Command>() {
        Ok(command) => info!(
            "[{}] {} on {}: {} (channel {})",
            received_at,
            command,
            topic,
            command.action(),
            command.device().channel()
        ),
        Err(e) => warn!("[{}] Ignoring message on {}: {}", received_at, topic, e),
    }
}
