use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use iced::widget::{button, checkbox, column, container, image, pick_list, row, text, text_input};
use iced::window::{self, Id};
use iced::{Alignment, Background, Color, ContentFit, Element, Length, Point, Size, Task};

use crate::adapters::ImageExporter;
use crate::core::models::{CaptureBuffer, CaptureMode, CaptureRect, LaunchMode, UserSettings};
use crate::core::orchestrators::image_grabber::{GrabberEvent, ImageGrabber};
use crate::global_constants::{
    APPLICATION_TITLE, CLI_EXIT_CODE_CANCELED, CLI_EXIT_CODE_FAILED, FRAME_COLOR_NAMES,
    LOG_TAG_APP, LOG_TAG_CAPTURE, WINDOW_HIDE_BUFFER_MS,
};
use crate::ports::{GlobalKeyboardEvent, TrayEvent};
use crate::presentation::app_theme;
use crate::presentation::{
    ColorComboBox, ColorEntry, SnippingArea, SnippingAreaEvent, SnippingAreaMessage,
};

const STATUS_READY: &str = "Ready - press New Capture or PrintScreen";

pub enum AppWindow {
    Main,
    SnippingArea(SnippingArea),
}

/// One capture as requested from the main window, a hotkey, the tray or the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub capture_mode_name: String,
    pub capture_cursor: bool,
    pub delay_ms: i64,
}

/// How a command line capture run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliOutcome {
    Saved,
    Failed,
    Canceled,
}

impl CliOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            CliOutcome::Saved => 0,
            CliOutcome::Failed => CLI_EXIT_CODE_FAILED,
            CliOutcome::Canceled => CLI_EXIT_CODE_CANCELED,
        }
    }
}

#[derive(Debug, Clone)]
pub enum OrchestratorMessage {
    OpenMainWindow,
    NewCapture,
    StartCapture(CaptureRequest),
    SnippingAreaMessage(Id, SnippingAreaMessage),
    PerformGrab,
    GrabFinished(CaptureBuffer),
    CaptureError(String),
    SaveCapture,
    CopyCapture,
    UpdateCaptureMode(CaptureMode),
    UpdateDelay(String),
    UpdateCaptureCursor(bool),
    UpdateFrameColor(ColorEntry),
    UpdateSystemTrayMode(bool),
    WindowClosed(Id),
    Keyboard(GlobalKeyboardEvent),
    TrayEvent(TrayEvent),
    CliFinished(CliOutcome),
}

pub struct AppOrchestrator {
    image_grabber: ImageGrabber,
    windows: HashMap<Id, AppWindow>,
    main_window_id: Option<Id>,
    snipping_window_id: Option<Id>,
    settings: UserSettings,
    autosave_settings: bool,
    delay_input: String,
    color_combo_box: ColorComboBox,
    last_capture: Option<CaptureBuffer>,
    status: String,
    launch_mode: LaunchMode,
    cli_save_path: Option<PathBuf>,
    cli_outcome: Option<CliOutcome>,
}

impl AppOrchestrator {
    pub fn build(
        image_grabber: ImageGrabber,
        settings: UserSettings,
        launch_mode: LaunchMode,
        cli_save_path: Option<PathBuf>,
    ) -> Self {
        let mut color_combo_box = ColorComboBox::new(FRAME_COLOR_NAMES);
        color_combo_box.set_color_name(&settings.snipping_frame_color);

        Self {
            image_grabber,
            windows: HashMap::new(),
            main_window_id: None,
            snipping_window_id: None,
            delay_input: settings.capture_delay_seconds.to_string(),
            settings,
            autosave_settings: launch_mode == LaunchMode::Gui,
            color_combo_box,
            last_capture: None,
            status: STATUS_READY.to_string(),
            launch_mode,
            cli_save_path,
            cli_outcome: None,
        }
    }

    pub fn get_window_title(&self, window_id: Id) -> String {
        match self.windows.get(&window_id) {
            Some(AppWindow::SnippingArea(_)) => format!("{} - select area", APPLICATION_TITLE),
            _ => APPLICATION_TITLE.to_string(),
        }
    }

    pub fn update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        log::debug!("[ORCHESTRATOR] Received message: {:?}", message);

        match message {
            OrchestratorMessage::OpenMainWindow => self.handle_open_main_window(),
            OrchestratorMessage::NewCapture => self.handle_new_capture(),
            OrchestratorMessage::StartCapture(request) => self.handle_start_capture(request),
            OrchestratorMessage::SnippingAreaMessage(window_id, snipping_message) => {
                self.handle_snipping_area_message(window_id, snipping_message)
            }
            OrchestratorMessage::PerformGrab => self.handle_perform_grab(),
            OrchestratorMessage::GrabFinished(buffer) => self.handle_grab_finished(buffer),
            OrchestratorMessage::CaptureError(error_message) => {
                self.handle_capture_error(error_message)
            }
            OrchestratorMessage::SaveCapture => self.handle_save_capture(),
            OrchestratorMessage::CopyCapture => self.handle_copy_capture(),
            OrchestratorMessage::UpdateCaptureMode(capture_mode) => {
                self.settings.capture_mode = capture_mode;
                self.persist_settings();
                Task::none()
            }
            OrchestratorMessage::UpdateDelay(input) => {
                self.handle_update_delay(input);
                Task::none()
            }
            OrchestratorMessage::UpdateCaptureCursor(enabled) => {
                self.settings.capture_cursor = enabled;
                self.persist_settings();
                Task::none()
            }
            OrchestratorMessage::UpdateFrameColor(entry) => {
                self.color_combo_box.set_color(entry.color());
                self.settings.snipping_frame_color = self.color_combo_box.color_name();
                self.persist_settings();
                Task::none()
            }
            OrchestratorMessage::UpdateSystemTrayMode(enabled) => {
                self.settings.run_in_system_tray = enabled;
                self.persist_settings();
                Task::none()
            }
            OrchestratorMessage::WindowClosed(window_id) => self.handle_window_closed(window_id),
            OrchestratorMessage::Keyboard(GlobalKeyboardEvent::CaptureHotkeyPressed) => {
                self.handle_new_capture()
            }
            OrchestratorMessage::Keyboard(GlobalKeyboardEvent::EscapePressed) => {
                self.handle_escape_pressed()
            }
            OrchestratorMessage::TrayEvent(event) => self.handle_tray_event(event),
            OrchestratorMessage::CliFinished(outcome) => Self::exit_cli(outcome),
        }
    }

    pub fn render_view(&self, window_id: Id) -> Element<'_, OrchestratorMessage> {
        match self.windows.get(&window_id) {
            Some(AppWindow::Main) => self.render_main_window(),
            Some(AppWindow::SnippingArea(snipping_area)) => snipping_area
                .render_ui()
                .map(move |message| OrchestratorMessage::SnippingAreaMessage(window_id, message)),
            None => text("Loading...").into(),
        }
    }

    fn handle_open_main_window(&mut self) -> Task<OrchestratorMessage> {
        if let Some(id) = self.main_window_id {
            log::debug!("[ORCHESTRATOR] Main window already open, restoring it");
            return window::minimize(id, false).chain(window::gain_focus(id));
        }

        let (id, task) = window::open(window::Settings {
            size: Size::new(560.0, 640.0),
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        });

        self.main_window_id = Some(id);
        self.windows.insert(id, AppWindow::Main);
        log::info!("[ORCHESTRATOR] Main window created with ID: {:?}", id);
        task.discard()
    }

    fn current_request(&self) -> CaptureRequest {
        CaptureRequest {
            capture_mode_name: self.settings.capture_mode.name().to_string(),
            capture_cursor: self.settings.capture_cursor,
            delay_ms: self.settings.capture_delay_ms(),
        }
    }

    fn handle_new_capture(&mut self) -> Task<OrchestratorMessage> {
        if self.image_grabber.is_capturing() {
            log::warn!("{} capture already running, ignoring request", LOG_TAG_CAPTURE);
            return Task::none();
        }

        let request = self.current_request();
        let Some(main_id) = self.main_window_id else {
            return Task::done(OrchestratorMessage::StartCapture(request));
        };

        log::info!("{} minimizing main window before capture", LOG_TAG_CAPTURE);
        self.status = "Preparing capture...".to_string();

        // Rect area grabs its background and active window reads focus as soon as the grabber
        // starts, so the main window must be gone first.
        if matches!(
            self.settings.capture_mode,
            CaptureMode::RectArea | CaptureMode::ActiveWindow
        ) {
            let hide_buffer = Duration::from_millis(WINDOW_HIDE_BUFFER_MS as u64);
            return window::minimize(main_id, true).chain(Task::future(async move {
                tokio::time::sleep(hide_buffer).await;
                OrchestratorMessage::StartCapture(request)
            }));
        }

        Task::batch(vec![
            window::minimize(main_id, true),
            Task::done(OrchestratorMessage::StartCapture(request)),
        ])
    }

    fn handle_start_capture(&mut self, request: CaptureRequest) -> Task<OrchestratorMessage> {
        log::info!("{} capture requested: {:?}", LOG_TAG_CAPTURE, request);

        let event = self.image_grabber.grab_image_named(
            &request.capture_mode_name,
            request.capture_cursor,
            request.delay_ms,
        );
        self.handle_grabber_event(event)
    }

    fn handle_grabber_event(&mut self, event: GrabberEvent) -> Task<OrchestratorMessage> {
        match event {
            GrabberEvent::ShowSnippingArea { area, background } => {
                self.open_snipping_area(area, background)
            }
            GrabberEvent::ScheduleGrab { delay } => {
                self.status = format!("Waiting {} ms before capture...", delay.as_millis());
                Task::future(async move {
                    tokio::time::sleep(delay).await;
                    OrchestratorMessage::PerformGrab
                })
            }
            GrabberEvent::Canceled => self.handle_capture_canceled(),
            GrabberEvent::Ignored => Task::none(),
        }
    }

    fn open_snipping_area(
        &mut self,
        area: CaptureRect,
        background: Option<CaptureBuffer>,
    ) -> Task<OrchestratorMessage> {
        let transparent = background.is_none();
        let (id, task) = window::open(window::Settings {
            position: window::Position::Specific(Point::new(area.x as f32, area.y as f32)),
            size: Size::new(area.width as f32, area.height as f32),
            transparent,
            decorations: false,
            resizable: false,
            level: window::Level::AlwaysOnTop,
            ..Default::default()
        });

        let snipping_area = SnippingArea::build(area, background, self.color_combo_box.color());
        self.windows.insert(id, AppWindow::SnippingArea(snipping_area));
        self.snipping_window_id = Some(id);
        self.status = "Select an area, Escape cancels".to_string();
        log::info!(
            "{} snipping area opened over {} with ID {:?}",
            LOG_TAG_CAPTURE,
            area,
            id
        );

        task.discard().chain(window::gain_focus(id))
    }

    fn handle_snipping_area_message(
        &mut self,
        window_id: Id,
        snipping_message: SnippingAreaMessage,
    ) -> Task<OrchestratorMessage> {
        let snipping_event = match self.windows.get_mut(&window_id) {
            Some(AppWindow::SnippingArea(snipping_area)) => snipping_area.update(snipping_message),
            _ => {
                log::warn!("[ORCHESTRATOR] Snipping window {:?} not found", window_id);
                return Task::none();
            }
        };

        match snipping_event {
            Some(SnippingAreaEvent::AreaSelected(rect)) => {
                let close_task = self.close_snipping_area();
                let event = self.image_grabber.area_selected(rect);
                close_task.chain(self.handle_grabber_event(event))
            }
            Some(SnippingAreaEvent::Cancel) => {
                let close_task = self.close_snipping_area();
                let event = self.image_grabber.area_canceled();
                close_task.chain(self.handle_grabber_event(event))
            }
            None => Task::none(),
        }
    }

    /// Stops tracking the overlay so its close event is not mistaken for a cancel.
    fn close_snipping_area(&mut self) -> Task<OrchestratorMessage> {
        match self.snipping_window_id.take() {
            Some(id) => {
                self.windows.remove(&id);
                window::close(id)
            }
            None => Task::none(),
        }
    }

    fn handle_perform_grab(&mut self) -> Task<OrchestratorMessage> {
        let pending_grab = match self.image_grabber.prepare_grab() {
            Ok(pending_grab) => pending_grab,
            Err(error) => {
                return Task::done(OrchestratorMessage::CaptureError(format!(
                    "Capture failed: {:#}",
                    error
                )));
            }
        };

        self.status = "Capturing...".to_string();
        log::info!(
            "{} performing grab of {}",
            LOG_TAG_CAPTURE,
            pending_grab.capture_rect()
        );

        Task::future(async move {
            match pending_grab.execute() {
                Ok(buffer) => OrchestratorMessage::GrabFinished(buffer),
                Err(error) => {
                    OrchestratorMessage::CaptureError(format!("Capture failed: {:#}", error))
                }
            }
        })
    }

    fn handle_grab_finished(&mut self, buffer: CaptureBuffer) -> Task<OrchestratorMessage> {
        self.image_grabber.capture_completed();
        log::info!(
            "{} capture finished: {}x{}",
            LOG_TAG_CAPTURE,
            buffer.width,
            buffer.height
        );

        if self.launch_mode == LaunchMode::Cli {
            return self.finish_cli_capture(buffer);
        }

        self.status = format!("Captured {}x{}", buffer.width, buffer.height);
        self.last_capture = Some(buffer);
        self.restore_main_window()
    }

    fn finish_cli_capture(&mut self, buffer: CaptureBuffer) -> Task<OrchestratorMessage> {
        let path = self
            .cli_save_path
            .clone()
            .unwrap_or_else(|| ImageExporter::default_save_path(&self.settings));

        match ImageExporter::save_png(&buffer, &path) {
            Ok(saved_path) => {
                println!("{}", saved_path.display());
                self.finish_cli(CliOutcome::Saved)
            }
            Err(error) => {
                log::error!("{} {:#}", LOG_TAG_APP, error);
                self.finish_cli(CliOutcome::Failed)
            }
        }
    }

    fn finish_cli(&mut self, outcome: CliOutcome) -> Task<OrchestratorMessage> {
        self.cli_outcome = Some(outcome);
        Task::done(OrchestratorMessage::CliFinished(outcome))
    }

    fn exit_cli(outcome: CliOutcome) -> Task<OrchestratorMessage> {
        log::info!("{} command line capture ended: {:?}", LOG_TAG_APP, outcome);
        match outcome.exit_code() {
            0 => iced::exit(),
            code => std::process::exit(code),
        }
    }

    fn handle_capture_error(&mut self, error_message: String) -> Task<OrchestratorMessage> {
        log::error!("{} {}", LOG_TAG_CAPTURE, error_message);
        self.image_grabber.capture_completed();

        if self.launch_mode == LaunchMode::Cli {
            return self.finish_cli(CliOutcome::Failed);
        }

        self.status = error_message;
        self.restore_main_window()
    }

    fn handle_capture_canceled(&mut self) -> Task<OrchestratorMessage> {
        log::info!("{} capture canceled", LOG_TAG_CAPTURE);

        if self.launch_mode == LaunchMode::Cli {
            return self.finish_cli(CliOutcome::Canceled);
        }

        self.status = "Capture canceled".to_string();
        self.restore_main_window()
    }

    fn restore_main_window(&self) -> Task<OrchestratorMessage> {
        match self.main_window_id {
            Some(id) => window::minimize(id, false).chain(window::gain_focus(id)),
            None => Task::none(),
        }
    }

    fn handle_update_delay(&mut self, input: String) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.delay_input.clear();
            self.settings.capture_delay_seconds = 0;
            self.persist_settings();
            return;
        }

        match trimmed.parse::<u32>() {
            Ok(seconds) => {
                self.delay_input = trimmed.to_string();
                self.settings.capture_delay_seconds = seconds;
                self.persist_settings();
            }
            Err(_) => log::debug!("[ORCHESTRATOR] Ignoring delay input '{}'", input),
        }
    }

    fn handle_save_capture(&mut self) -> Task<OrchestratorMessage> {
        let Some(buffer) = &self.last_capture else {
            return Task::none();
        };

        let path = ImageExporter::default_save_path(&self.settings);
        self.status = match ImageExporter::save_png(buffer, &path) {
            Ok(saved_path) => format!("Saved to {}", saved_path.display()),
            Err(error) => format!("Save failed: {:#}", error),
        };
        Task::none()
    }

    fn handle_copy_capture(&mut self) -> Task<OrchestratorMessage> {
        let Some(buffer) = &self.last_capture else {
            return Task::none();
        };

        self.status = match ImageExporter::copy_to_clipboard(buffer) {
            Ok(()) => "Copied to clipboard".to_string(),
            Err(error) => format!("Copy failed: {:#}", error),
        };
        Task::none()
    }

    fn handle_escape_pressed(&mut self) -> Task<OrchestratorMessage> {
        match self.snipping_window_id {
            Some(id) => self.handle_snipping_area_message(id, SnippingAreaMessage::CancelRequested),
            None => Task::none(),
        }
    }

    fn handle_window_closed(&mut self, window_id: Id) -> Task<OrchestratorMessage> {
        log::info!("[ORCHESTRATOR] Window closed: {:?}", window_id);

        if Some(window_id) == self.snipping_window_id {
            self.snipping_window_id = None;
            self.windows.remove(&window_id);
            let event = self.image_grabber.area_canceled();
            return self.handle_grabber_event(event);
        }

        if Some(window_id) == self.main_window_id {
            self.main_window_id = None;
            self.windows.remove(&window_id);

            if !self.settings.run_in_system_tray {
                log::info!("{} Main window closed, exiting", LOG_TAG_APP);
                return iced::exit();
            }
            log::info!("{} Main window closed, still running in system tray", LOG_TAG_APP);
        }

        Task::none()
    }

    fn handle_tray_event(&mut self, event: TrayEvent) -> Task<OrchestratorMessage> {
        log::info!("[ORCHESTRATOR] Handling tray event: {:?}", event);

        match event {
            TrayEvent::NewCapture => self.handle_new_capture(),
            TrayEvent::ShowWindow => self.handle_open_main_window(),
            TrayEvent::Quit => iced::exit(),
        }
    }

    fn persist_settings(&self) {
        if !self.autosave_settings {
            return;
        }
        if let Err(error) = self.settings.save() {
            log::error!("[ORCHESTRATOR] Failed to save settings: {}", error);
        }
    }

    fn render_main_window(&self) -> Element<'_, OrchestratorMessage> {
        let theme = app_theme::get_theme(&self.settings.theme_mode);
        let muted = |_theme: &iced::Theme| text::Style {
            color: Some(Color::from_rgba(0.6, 0.6, 0.6, 1.0)),
        };

        let mode_row = row![
            text("Mode").size(14).width(Length::Fixed(90.0)),
            pick_list(
                CaptureMode::ALL.to_vec(),
                Some(self.settings.capture_mode),
                OrchestratorMessage::UpdateCaptureMode,
            )
            .padding(8),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let delay_row = row![
            text("Delay (s)").size(14).width(Length::Fixed(90.0)),
            text_input("0", &self.delay_input)
                .on_input(OrchestratorMessage::UpdateDelay)
                .width(Length::Fixed(80.0))
                .padding(8),
            checkbox(self.settings.capture_cursor)
                .on_toggle(OrchestratorMessage::UpdateCaptureCursor),
            text("Capture cursor").size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let color_row = row![
            text("Frame").size(14).width(Length::Fixed(90.0)),
            self.color_combo_box
                .view(OrchestratorMessage::UpdateFrameColor),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let capture_btn = button(text("New Capture").size(16))
            .padding([12, 32])
            .style(app_theme::capture_button_style)
            .on_press_maybe(
                (!self.image_grabber.is_capturing()).then_some(OrchestratorMessage::NewCapture),
            );

        let preview: Element<'_, OrchestratorMessage> = match &self.last_capture {
            Some(buffer) => image(buffer.image_handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fixed(260.0))
                .into(),
            None => container(text("No capture yet").style(muted))
                .width(Length::Fill)
                .height(Length::Fixed(260.0))
                .center_x(Length::Fill)
                .center_y(Length::Fixed(260.0))
                .into(),
        };

        let has_capture = self.last_capture.is_some();
        let export_row = row![
            button(text("Save").size(14))
                .padding([8, 20])
                .style(app_theme::secondary_button_style)
                .on_press_maybe(has_capture.then_some(OrchestratorMessage::SaveCapture)),
            button(text("Copy").size(14))
                .padding([8, 20])
                .style(app_theme::secondary_button_style)
                .on_press_maybe(has_capture.then_some(OrchestratorMessage::CopyCapture)),
        ]
        .spacing(12);

        let status_color = app_theme::status_color(&self.status);
        let status_row = row![
            text("●")
                .size(12)
                .style(move |_theme: &iced::Theme| text::Style {
                    color: Some(status_color),
                }),
            text(&self.status).size(13).style(muted),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let tray_row = row![
            checkbox(self.settings.run_in_system_tray)
                .on_toggle(OrchestratorMessage::UpdateSystemTrayMode),
            text("Keep running in system tray").size(14),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let content = column![
            text(APPLICATION_TITLE).size(24),
            mode_row,
            delay_row,
            color_row,
            capture_btn,
            preview,
            export_row,
            status_row,
            tray_row,
        ]
        .spacing(16)
        .padding(24)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                let palette = theme.palette();
                container::Style {
                    background: Some(Background::Color(palette.background)),
                    text_color: Some(palette.text),
                    ..Default::default()
                }
            })
            .into()
    }
}
