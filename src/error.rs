use thiserror::Error;

#[derive(Error, Debug)]
pub enum GesturecamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame source error: {details}")]
    Source { details: String },

    #[error("Publish error: {details}")]
    Publish { details: String },

    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl GesturecamError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn frame_source<S: Into<String>>(details: S) -> Self {
        Self::Source {
            details: details.into(),
        }
    }

    pub fn publish<S: Into<String>>(details: S) -> Self {
        Self::Publish {
            details: details.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    #[error("Receiver lagged behind by {0} events")]
    Lagged(u64),

    #[error("Event bus channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, GesturecamError>;
