use super::keyboard_input::KeyboardInputHandler;
use super::types::ShutdownReason;
use crate::classifier::GestureController;
use crate::config::GesturecamConfig;
use crate::events::EventBus;
use crate::publisher::CommandPublisher;
use crate::source::FrameSource;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Main application coordinator: drives frames from the source through the
/// gesture controller until the stream ends or shutdown is requested
pub struct GesturecamOrchestrator {
    pub(super) config: GesturecamConfig,
    pub(super) event_bus: Arc<EventBus>,
    pub(super) controller: GestureController<Box<dyn CommandPublisher>>,
    pub(super) source: Option<Box<dyn FrameSource>>,
    pub(super) keyboard_handler: Option<KeyboardInputHandler>,
    pub(super) frames_processed: u64,

    // Lifecycle management
    pub(super) shutdown_sender: mpsc::Sender<ShutdownReason>,
    pub(super) shutdown_receiver: Option<mpsc::Receiver<ShutdownReason>>,
    pub(super) cancellation_token: CancellationToken,
}

impl GesturecamOrchestrator {
    /// Create an orchestrator around an already opened source and publisher
    pub fn new(
        config: GesturecamConfig,
        source: Box<dyn FrameSource>,
        publisher: Box<dyn CommandPublisher>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new(config.system.event_bus_capacity));
        let (shutdown_sender, shutdown_receiver) = mpsc::channel(1);

        let controller = GestureController::new(
            config.thresholds.clone(),
            publisher,
            config.mqtt.topic.clone(),
        );

        let keyboard_handler = config
            .system
            .keyboard_quit
            .then(|| KeyboardInputHandler::new(Arc::clone(&event_bus)));

        Self {
            config,
            event_bus,
            controller,
            source: Some(source),
            keyboard_handler,
            frames_processed: 0,
            shutdown_sender,
            shutdown_receiver: Some(shutdown_receiver),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &GesturecamConfig {
        &self.config
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn controller(&self) -> &GestureController<Box<dyn CommandPublisher>> {
        &self.controller
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
