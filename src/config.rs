use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GesturecamConfig {
    pub source: SourceConfig,
    pub frame: FrameConfig,
    pub thresholds: ThresholdConfig,
    pub mqtt: MqttConfig,
    pub system: SystemConfig,
}

/// Where landmark frames come from
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON-lines file recorded from a detector
    Replay,
    /// Detector subprocess streaming JSON lines on stdout
    Detector,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// Source type
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,

    /// Replay file path (kind = "replay")
    #[serde(default = "default_replay_path")]
    pub path: String,

    /// Detector executable (kind = "detector")
    #[serde(default = "default_detector_command")]
    pub command: String,

    /// Extra detector arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Which detected hand drives classification
    #[serde(default = "default_hand_index")]
    pub hand_index: usize,

    /// Maximum number of hands the detector should report
    #[serde(default = "default_max_hands")]
    pub max_hands: u32,

    /// Minimum detection confidence forwarded to the detector
    #[serde(default = "default_detection_confidence")]
    pub detection_confidence: f64,

    /// Minimum tracking confidence forwarded to the detector
    #[serde(default = "default_tracking_confidence")]
    pub tracking_confidence: f64,

    /// Landmark model complexity forwarded to the detector
    #[serde(default = "default_model_complexity")]
    pub model_complexity: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FrameConfig {
    /// Frame resolution (width, height) used for pixel positions
    #[serde(default = "default_frame_resolution")]
    pub resolution: (u32, u32),
}

/// Calibration constants for finger extension.
///
/// Ratios are fingertip distance over the wrist to thumb-CMC distance; a
/// finger is up when its ratio is at least the threshold. The thumb is up
/// when its cumulative joint bend is below `thumb_angle_degrees`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ThresholdConfig {
    #[serde(default = "default_index_ratio")]
    pub index: f64,

    #[serde(default = "default_middle_ratio")]
    pub middle: f64,

    #[serde(default = "default_ring_ratio")]
    pub ring: f64,

    #[serde(default = "default_pinky_ratio")]
    pub pinky: f64,

    #[serde(default = "default_thumb_angle")]
    pub thumb_angle_degrees: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MqttConfig {
    /// Broker host name
    #[serde(default = "default_mqtt_broker")]
    pub broker: String,

    /// Broker port
    #[serde(default = "default_mqtt_port")]
    pub port: u16,

    /// Keep-alive interval in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive_seconds: u64,

    /// Topic that receives command names
    #[serde(default = "default_mqtt_topic")]
    pub topic: String,

    /// Client id prefix, a random suffix is appended per run
    #[serde(default = "default_client_id_prefix")]
    pub client_id_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    /// Stop on q / Esc from the terminal
    #[serde(default = "default_keyboard_quit")]
    pub keyboard_quit: bool,
}

impl GesturecamConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("gesturecam.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Start with default values
            .set_default("source.kind", "replay")?
            .set_default("source.path", default_replay_path())?
            .set_default("source.command", default_detector_command())?
            .set_default("source.args", Vec::<String>::new())?
            .set_default("source.hand_index", default_hand_index() as i64)?
            .set_default("source.max_hands", default_max_hands())?
            .set_default(
                "source.detection_confidence",
                default_detection_confidence(),
            )?
            .set_default("source.tracking_confidence", default_tracking_confidence())?
            .set_default("source.model_complexity", default_model_complexity())?
            .set_default(
                "frame.resolution",
                vec![default_frame_resolution().0, default_frame_resolution().1],
            )?
            .set_default("thresholds.index", default_index_ratio())?
            .set_default("thresholds.middle", default_middle_ratio())?
            .set_default("thresholds.ring", default_ring_ratio())?
            .set_default("thresholds.pinky", default_pinky_ratio())?
            .set_default("thresholds.thumb_angle_degrees", default_thumb_angle())?
            .set_default("mqtt.broker", default_mqtt_broker())?
            .set_default("mqtt.port", default_mqtt_port())?
            .set_default("mqtt.keep_alive_seconds", default_keep_alive())?
            .set_default("mqtt.topic", default_mqtt_topic())?
            .set_default("mqtt.client_id_prefix", default_client_id_prefix())?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            .set_default("system.keyboard_quit", default_keyboard_quit())?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Environment overrides, e.g. GESTURECAM_MQTT__BROKER
            .add_source(
                Environment::with_prefix("GESTURECAM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: GesturecamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.resolution.0 == 0 || self.frame.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Frame resolution must be greater than 0".to_string(),
            ));
        }

        if self.source.max_hands == 0 {
            return Err(ConfigError::Message(
                "Source max_hands must be greater than 0".to_string(),
            ));
        }

        if self.source.hand_index >= self.source.max_hands as usize {
            return Err(ConfigError::Message(format!(
                "Source hand_index {} is out of range for max_hands {}",
                self.source.hand_index, self.source.max_hands
            )));
        }

        for (name, value) in [
            ("detection_confidence", self.source.detection_confidence),
            ("tracking_confidence", self.source.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Message(format!(
                    "Source {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        match self.source.kind {
            SourceKind::Replay if self.source.path.trim().is_empty() => {
                return Err(ConfigError::Message(
                    "Replay source requires a path".to_string(),
                ));
            }
            SourceKind::Detector if self.source.command.trim().is_empty() => {
                return Err(ConfigError::Message(
                    "Detector source requires a command".to_string(),
                ));
            }
            _ => {}
        }

        self.thresholds.validate()?;

        if self.mqtt.broker.trim().is_empty() {
            return Err(ConfigError::Message(
                "MQTT broker must not be empty".to_string(),
            ));
        }

        if self.mqtt.topic.trim().is_empty() {
            return Err(ConfigError::Message(
                "MQTT topic must not be empty".to_string(),
            ));
        }

        if self.mqtt.keep_alive_seconds < 5 {
            return Err(ConfigError::Message(
                "MQTT keep_alive_seconds must be at least 5".to_string(),
            ));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, ratio) in [
            ("index", self.index),
            ("middle", self.middle),
            ("ring", self.ring),
            ("pinky", self.pinky),
        ] {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(ConfigError::Message(format!(
                    "Threshold ratio for {} must be a positive number, got {}",
                    name, ratio
                )));
            }
        }

        // Three joints bend at most 180 degrees each
        if !self.thumb_angle_degrees.is_finite()
            || self.thumb_angle_degrees <= 0.0
            || self.thumb_angle_degrees > 540.0
        {
            return Err(ConfigError::Message(format!(
                "Thumb angle threshold must be within (0, 540] degrees, got {}",
                self.thumb_angle_degrees
            )));
        }

        Ok(())
    }
}

impl Default for GesturecamConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            frame: FrameConfig {
                resolution: default_frame_resolution(),
            },
            thresholds: ThresholdConfig::default(),
            mqtt: MqttConfig::default(),
            system: SystemConfig {
                event_bus_capacity: default_event_bus_capacity(),
                keyboard_quit: default_keyboard_quit(),
            },
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            path: default_replay_path(),
            command: default_detector_command(),
            args: Vec::new(),
            hand_index: default_hand_index(),
            max_hands: default_max_hands(),
            detection_confidence: default_detection_confidence(),
            tracking_confidence: default_tracking_confidence(),
            model_complexity: default_model_complexity(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            index: default_index_ratio(),
            middle: default_middle_ratio(),
            ring: default_ring_ratio(),
            pinky: default_pinky_ratio(),
            thumb_angle_degrees: default_thumb_angle(),
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: default_mqtt_broker(),
            port: default_mqtt_port(),
            keep_alive_seconds: default_keep_alive(),
            topic: default_mqtt_topic(),
            client_id_prefix: default_client_id_prefix(),
        }
    }
}

// Default value functions
fn default_source_kind() -> SourceKind {
    SourceKind::Replay
}
fn default_replay_path() -> String {
    "./landmarks.jsonl".to_string()
}
fn default_detector_command() -> String {
    "hand-detector".to_string()
}
fn default_hand_index() -> usize {
    0
}
fn default_max_hands() -> u32 {
    2
}
fn default_detection_confidence() -> f64 {
    0.5
}
fn default_tracking_confidence() -> f64 {
    0.5
}
fn default_model_complexity() -> u32 {
    1
}

fn default_frame_resolution() -> (u32, u32) {
    (640, 480)
}

fn default_index_ratio() -> f64 {
    6.6
}
fn default_middle_ratio() -> f64 {
    7.2
}
fn default_ring_ratio() -> f64 {
    7.0
}
fn default_pinky_ratio() -> f64 {
    5.9
}
fn default_thumb_angle() -> f64 {
    50.0
}

fn default_mqtt_broker() -> String {
    "broker.hivemq.com".to_string()
}
fn default_mqtt_port() -> u16 {
    1883
}
fn default_keep_alive() -> u64 {
    60
}
fn default_mqtt_topic() -> String {
    "home/central".to_string()
}
fn default_client_id_prefix() -> String {
    "gesturecam".to_string()
}

fn default_event_bus_capacity() -> usize {
    100
}
fn default_keyboard_quit() -> bool {
    true
}
