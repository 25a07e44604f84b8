use std::sync::Arc;

use iced::window::Id;
use iced::{Element, Task};

use crate::adapters::ArrowCursorBlender;
use crate::cli::CliArguments;
use crate::core::models::{LaunchMode, UserSettings};
use crate::core::orchestrators::app_orchestrator::{
    AppOrchestrator, CaptureRequest, OrchestratorMessage,
};
use crate::core::orchestrators::image_grabber::ImageGrabber;
use crate::global_constants::{LOG_TAG_APP, TRAY_POLL_INTERVAL_MS};
use crate::ports::{
    GlobalKeyboardListener, ProcessCompositorProbe, SystemMousePositionProvider, SystemTray,
    XcapScreenCapturer,
};

pub struct SnipApp {
    orchestrator: AppOrchestrator,
    _tray: Option<SystemTray>,
    launch_mode: LaunchMode,
}

impl SnipApp {
    pub fn build(cli_arguments: CliArguments) -> (Self, Task<OrchestratorMessage>) {
        let launch_mode = cli_arguments.launch_mode();
        log::info!("{} Initializing application in {:?} mode", LOG_TAG_APP, launch_mode);

        let settings = UserSettings::load().unwrap_or_else(|e| {
            log::warn!("{} Failed to load settings: {}, using defaults", LOG_TAG_APP, e);
            UserSettings::default()
        });

        let screen_capturer = Arc::new(XcapScreenCapturer::initialize());
        let image_grabber = ImageGrabber::build(
            screen_capturer.clone(),
            screen_capturer,
            Arc::new(SystemMousePositionProvider::initialize()),
            Arc::new(ProcessCompositorProbe::initialize()),
            Arc::new(ArrowCursorBlender::initialize()),
            launch_mode,
        );

        let orchestrator = AppOrchestrator::build(
            image_grabber,
            settings,
            launch_mode,
            cli_arguments.save_path.clone(),
        );

        let delay_ms = cli_arguments.delay_ms();
        let (tray, initial_task) = match (launch_mode, cli_arguments.capture_mode_name) {
            (LaunchMode::Cli, Some(capture_mode_name)) => {
                let request = CaptureRequest {
                    capture_mode_name,
                    capture_cursor: cli_arguments.capture_cursor,
                    delay_ms,
                };
                (None, Task::done(OrchestratorMessage::StartCapture(request)))
            }
            _ => {
                let tray = match SystemTray::build() {
                    Ok(tray) => {
                        log::info!("{} System tray initialized successfully", LOG_TAG_APP);
                        Some(tray)
                    }
                    Err(e) => {
                        log::error!("{} Failed to initialize system tray: {}", LOG_TAG_APP, e);
                        None
                    }
                };
                (tray, Task::done(OrchestratorMessage::OpenMainWindow))
            }
        };

        (
            Self {
                orchestrator,
                _tray: tray,
                launch_mode,
            },
            initial_task,
        )
    }

    pub fn handle_update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        self.orchestrator.update(message)
    }

    pub fn render_view(&self, window_id: Id) -> Element<'_, OrchestratorMessage> {
        self.orchestrator.render_view(window_id)
    }

    pub fn window_title(&self, window_id: Id) -> String {
        self.orchestrator.get_window_title(window_id)
    }

    pub fn handle_subscription(&self) -> iced::Subscription<OrchestratorMessage> {
        use iced::window;

        let mut subscriptions = vec![
            iced::event::listen_with(|event, _status, id| {
                if let iced::Event::Window(window::Event::Closed) = event {
                    return Some(OrchestratorMessage::WindowClosed(id));
                }
                None
            }),
            iced::Subscription::run(GlobalKeyboardListener::create_event_stream)
                .map(OrchestratorMessage::Keyboard),
        ];

        if self.launch_mode == LaunchMode::Gui {
            subscriptions.push(iced::Subscription::run(|| {
                iced::stream::channel(
                    10,
                    |mut output: futures::channel::mpsc::Sender<OrchestratorMessage>| async move {
                        loop {
                            tokio::time::sleep(std::time::Duration::from_millis(
                                TRAY_POLL_INTERVAL_MS,
                            ))
                            .await;
                            if let Some(event) = SystemTray::poll_events() {
                                let _ = output.try_send(OrchestratorMessage::TrayEvent(event));
                            }
                        }
                    },
                )
            }));
        }

        iced::Subscription::batch(subscriptions)
    }
}
