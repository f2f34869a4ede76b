use super::CommandPublisher;
use crate::error::{GesturecamError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// In-memory publisher for tests; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    messages: Arc<Mutex<Vec<(String, String)>>>,
    fail: Arc<Mutex<bool>>,
    closed: Arc<Mutex<bool>>,
    fail_close: Arc<Mutex<bool>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (the attempt is still recorded)
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    /// Make `close` fail, like a broker that went away
    pub fn set_close_failing(&self, fail: bool) {
        *self.fail_close.lock() = fail;
    }

    /// All `(topic, message)` pairs attempted so far
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

#[async_trait]
impl CommandPublisher for RecordingPublisher {
    fn publish(&mut self, topic: &str, message: &str) -> Result<()> {
        debug!("Recording publish {} <- {}", topic, message);
        self.messages
            .lock()
            .push((topic.to_string(), message.to_string()));

        if *self.fail.lock() {
            return Err(GesturecamError::publish("recording publisher set to fail"));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        *self.closed.lock() = true;
        if *self.fail_close.lock() {
            return Err(GesturecamError::publish("broker connection lost"));
        }
        Ok(())
    }
}
