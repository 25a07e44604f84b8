use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::core::models::{CaptureBuffer, CaptureMode, CaptureRect, LaunchMode};
use crate::core::ports::{
    CompositorProbe, CursorBlender, MousePositionProvider, ScreenCapturer, ScreenGeometryProvider,
};
use crate::global_constants::{
    DEFAULT_MOUSE_POSITION_X, DEFAULT_MOUSE_POSITION_Y, LOG_TAG_GRABBER,
    MESSAGE_MOUSE_POSITION_FAILED, MESSAGE_NO_FOCUSED_WINDOW, MESSAGE_UNKNOWN_CAPTURE_MODE,
    MIN_CAPTURE_DELAY_MS, WINDOW_HIDE_BUFFER_MS,
};

/// What the event loop has to do next for the capture in progress.
#[derive(Debug, Clone)]
pub enum GrabberEvent {
    ShowSnippingArea {
        area: CaptureRect,
        background: Option<CaptureBuffer>,
    },
    ScheduleGrab {
        delay: Duration,
    },
    Canceled,
    /// A capture is already running, the request was dropped.
    Ignored,
}

/// A grab with its target frozen, ready to run off the update loop.
pub struct PendingGrab {
    screen_capturer: Arc<dyn ScreenCapturer>,
    mouse_provider: Arc<dyn MousePositionProvider>,
    cursor_blender: Arc<dyn CursorBlender>,
    capture_rect: CaptureRect,
    capture_cursor: bool,
}

impl PendingGrab {
    pub fn capture_rect(&self) -> CaptureRect {
        self.capture_rect
    }

    pub fn execute(self) -> Result<CaptureBuffer> {
        log::info!("{} grabbing {}", LOG_TAG_GRABBER, self.capture_rect);

        let screenshot = self.screen_capturer.grab_rect(&self.capture_rect)?;

        if !self.capture_cursor {
            return Ok(screenshot);
        }

        match self.mouse_provider.get_current_mouse_position() {
            Ok(cursor) => {
                log::debug!(
                    "{} blending cursor at ({}, {})",
                    LOG_TAG_GRABBER,
                    cursor.0,
                    cursor.1
                );
                self.cursor_blender
                    .blend_cursor(screenshot, &self.capture_rect, cursor)
            }
            Err(error) => {
                log::warn!(
                    "{} cursor position unavailable, skipping cursor: {}",
                    LOG_TAG_GRABBER,
                    error
                );
                Ok(screenshot)
            }
        }
    }
}

pub struct ImageGrabber {
    screen_capturer: Arc<dyn ScreenCapturer>,
    geometry_provider: Arc<dyn ScreenGeometryProvider>,
    mouse_provider: Arc<dyn MousePositionProvider>,
    compositor_probe: Arc<dyn CompositorProbe>,
    cursor_blender: Arc<dyn CursorBlender>,
    launch_mode: LaunchMode,
    capture_rect: CaptureRect,
    capture_cursor: bool,
    capture_delay_ms: i64,
    is_capturing: bool,
}

impl ImageGrabber {
    pub fn build(
        screen_capturer: Arc<dyn ScreenCapturer>,
        geometry_provider: Arc<dyn ScreenGeometryProvider>,
        mouse_provider: Arc<dyn MousePositionProvider>,
        compositor_probe: Arc<dyn CompositorProbe>,
        cursor_blender: Arc<dyn CursorBlender>,
        launch_mode: LaunchMode,
    ) -> Self {
        Self {
            screen_capturer,
            geometry_provider,
            mouse_provider,
            compositor_probe,
            cursor_blender,
            launch_mode,
            capture_rect: CaptureRect::default(),
            capture_cursor: false,
            capture_delay_ms: 0,
            is_capturing: false,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.is_capturing
    }

    pub fn grab_image_named(
        &mut self,
        capture_mode_name: &str,
        capture_cursor: bool,
        delay_ms: i64,
    ) -> GrabberEvent {
        match capture_mode_name.parse::<CaptureMode>() {
            Ok(capture_mode) => self.grab_image(capture_mode, capture_cursor, delay_ms),
            Err(error) => {
                log::error!(
                    "{} {}: {}",
                    LOG_TAG_GRABBER,
                    MESSAGE_UNKNOWN_CAPTURE_MODE,
                    error
                );
                self.cancel()
            }
        }
    }

    pub fn grab_image(
        &mut self,
        capture_mode: CaptureMode,
        capture_cursor: bool,
        delay_ms: i64,
    ) -> GrabberEvent {
        if self.is_capturing {
            log::warn!(
                "{} capture already in progress, ignoring {} request",
                LOG_TAG_GRABBER,
                capture_mode.name()
            );
            return GrabberEvent::Ignored;
        }

        log::info!(
            "{} starting {} capture, cursor={}, delay={}ms",
            LOG_TAG_GRABBER,
            capture_mode.name(),
            capture_cursor,
            delay_ms
        );

        self.is_capturing = true;
        self.capture_cursor = capture_cursor;
        self.capture_delay_ms = delay_ms.max(0);

        let target_rect = match capture_mode {
            CaptureMode::RectArea => return self.show_snipping_area(),
            CaptureMode::FullScreen => self.geometry_provider.full_screen_rect(),
            CaptureMode::CurrentScreen => self.current_screen_rect(),
            CaptureMode::ActiveWindow => self.active_window_rect(),
        };

        match target_rect {
            Ok(rect) => {
                self.capture_rect = rect;
                self.schedule_grab()
            }
            Err(error) => {
                log::error!(
                    "{} unable to determine capture rect: {:#}",
                    LOG_TAG_GRABBER,
                    error
                );
                self.cancel()
            }
        }
    }

    pub fn area_selected(&mut self, rect: CaptureRect) -> GrabberEvent {
        if !self.is_capturing {
            log::warn!(
                "{} area selected without a capture in progress",
                LOG_TAG_GRABBER
            );
            return GrabberEvent::Ignored;
        }

        log::info!("{} area selected: {}", LOG_TAG_GRABBER, rect);
        self.capture_rect = rect;
        self.schedule_grab()
    }

    pub fn area_canceled(&mut self) -> GrabberEvent {
        log::info!("{} snipping area canceled", LOG_TAG_GRABBER);
        self.cancel()
    }

    /// Delay before the grab. Short GUI delays get a buffer so the main window can hide.
    pub fn delay(&self) -> Duration {
        let delay_ms = if self.launch_mode == LaunchMode::Cli
            || self.capture_delay_ms >= MIN_CAPTURE_DELAY_MS
        {
            self.capture_delay_ms
        } else {
            self.capture_delay_ms + WINDOW_HIDE_BUFFER_MS
        };

        Duration::from_millis(delay_ms as u64)
    }

    pub fn prepare_grab(&self) -> Result<PendingGrab> {
        if !self.is_capturing {
            anyhow::bail!("No capture in progress");
        }
        if self.capture_rect.is_null() {
            anyhow::bail!("Capture rect {} is empty", self.capture_rect);
        }

        Ok(PendingGrab {
            screen_capturer: Arc::clone(&self.screen_capturer),
            mouse_provider: Arc::clone(&self.mouse_provider),
            cursor_blender: Arc::clone(&self.cursor_blender),
            capture_rect: self.capture_rect,
            capture_cursor: self.capture_cursor,
        })
    }

    /// Ends the current capture once its grab has finished or failed.
    pub fn capture_completed(&mut self) {
        log::debug!("{} capture completed", LOG_TAG_GRABBER);
        self.is_capturing = false;
    }

    fn cancel(&mut self) -> GrabberEvent {
        self.is_capturing = false;
        GrabberEvent::Canceled
    }

    fn schedule_grab(&self) -> GrabberEvent {
        let delay = self.delay();
        log::debug!(
            "{} grab of {} scheduled in {}ms",
            LOG_TAG_GRABBER,
            self.capture_rect,
            delay.as_millis()
        );
        GrabberEvent::ScheduleGrab { delay }
    }

    fn show_snipping_area(&mut self) -> GrabberEvent {
        let full_screen_rect = match self.geometry_provider.full_screen_rect() {
            Ok(rect) => rect,
            Err(error) => {
                log::error!(
                    "{} unable to determine screen area for snipping: {:#}",
                    LOG_TAG_GRABBER,
                    error
                );
                return self.cancel();
            }
        };

        if self.compositor_probe.is_compositor_active() {
            log::debug!(
                "{} compositor active, showing snipping area without background",
                LOG_TAG_GRABBER
            );
            return GrabberEvent::ShowSnippingArea {
                area: full_screen_rect,
                background: None,
            };
        }

        log::debug!(
            "{} no compositor, grabbing background for snipping area",
            LOG_TAG_GRABBER
        );
        let background = match self.screen_capturer.grab_rect(&full_screen_rect) {
            Ok(buffer) => Some(buffer),
            Err(error) => {
                log::warn!(
                    "{} background grab failed, showing bare snipping area: {:#}",
                    LOG_TAG_GRABBER,
                    error
                );
                None
            }
        };

        GrabberEvent::ShowSnippingArea {
            area: full_screen_rect,
            background,
        }
    }

    /// Rect of the screen the mouse cursor is currently on.
    fn current_screen_rect(&self) -> Result<CaptureRect> {
        let (x_position, y_position) = match self.mouse_provider.get_current_mouse_position() {
            Ok(position) => position,
            Err(error) => {
                log::warn!(
                    "{} {}: {}",
                    LOG_TAG_GRABBER,
                    MESSAGE_MOUSE_POSITION_FAILED,
                    error
                );
                (DEFAULT_MOUSE_POSITION_X, DEFAULT_MOUSE_POSITION_Y)
            }
        };

        self.geometry_provider.screen_rect_at(x_position, y_position)
    }

    fn active_window_rect(&self) -> Result<CaptureRect> {
        let window_rect = match self.geometry_provider.active_window_rect() {
            Ok(rect) => rect,
            Err(error) => {
                log::warn!(
                    "{} active window lookup failed: {:#}",
                    LOG_TAG_GRABBER,
                    error
                );
                None
            }
        };

        match window_rect {
            Some(rect) if !rect.is_null() => Ok(rect),
            _ => {
                log::warn!("{} {}", LOG_TAG_GRABBER, MESSAGE_NO_FOCUSED_WINDOW);
                self.current_screen_rect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const LEFT_SCREEN: CaptureRect = CaptureRect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };
    const RIGHT_SCREEN: CaptureRect = CaptureRect {
        x: 1920,
        y: 0,
        width: 2560,
        height: 1440,
    };

    #[derive(Default)]
    struct MockScreenCapturer {
        grabbed_rects: Mutex<Vec<CaptureRect>>,
        fail_grab: bool,
    }

    impl MockScreenCapturer {
        fn grabbed(&self) -> Vec<CaptureRect> {
            self.grabbed_rects.lock().unwrap().clone()
        }
    }

    impl ScreenCapturer for MockScreenCapturer {
        fn grab_rect(&self, rect: &CaptureRect) -> Result<CaptureBuffer> {
            self.grabbed_rects.lock().unwrap().push(*rect);
            if self.fail_grab {
                anyhow::bail!("screen capture denied");
            }
            let raw_data = vec![0u8; (rect.width * rect.height * 4) as usize];
            Ok(CaptureBuffer::build_from_raw_data(
                1.0,
                rect.width,
                rect.height,
                raw_data,
            ))
        }
    }

    struct MockGeometryProvider {
        active_window: Option<CaptureRect>,
        fail_full_screen: bool,
    }

    impl ScreenGeometryProvider for MockGeometryProvider {
        fn full_screen_rect(&self) -> Result<CaptureRect> {
            if self.fail_full_screen {
                anyhow::bail!("no monitors");
            }
            Ok(LEFT_SCREEN.union(&RIGHT_SCREEN))
        }

        fn screen_rect_at(&self, x_position: i32, y_position: i32) -> Result<CaptureRect> {
            [LEFT_SCREEN, RIGHT_SCREEN]
                .into_iter()
                .find(|screen| screen.contains_point(x_position, y_position))
                .ok_or_else(|| anyhow::anyhow!("no screen at point"))
        }

        fn active_window_rect(&self) -> Result<Option<CaptureRect>> {
            Ok(self.active_window)
        }
    }

    struct MockMouseProvider(Result<(i32, i32), String>);

    impl MousePositionProvider for MockMouseProvider {
        fn get_current_mouse_position(&self) -> Result<(i32, i32), String> {
            self.0.clone()
        }
    }

    struct MockCompositorProbe(bool);

    impl CompositorProbe for MockCompositorProbe {
        fn is_compositor_active(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct MockCursorBlender {
        calls: AtomicUsize,
    }

    impl CursorBlender for MockCursorBlender {
        fn blend_cursor(
            &self,
            buffer: CaptureBuffer,
            _capture_rect: &CaptureRect,
            _cursor: (i32, i32),
        ) -> Result<CaptureBuffer> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(buffer)
        }
    }

    struct Fixture {
        capturer: Arc<MockScreenCapturer>,
        blender: Arc<MockCursorBlender>,
        grabber: ImageGrabber,
    }

    fn create_fixture(
        active_window: Option<CaptureRect>,
        mouse_position: Result<(i32, i32), String>,
        compositor_active: bool,
        launch_mode: LaunchMode,
    ) -> Fixture {
        let capturer = Arc::new(MockScreenCapturer::default());
        let blender = Arc::new(MockCursorBlender::default());
        let grabber = ImageGrabber::build(
            capturer.clone(),
            Arc::new(MockGeometryProvider {
                active_window,
                fail_full_screen: false,
            }),
            Arc::new(MockMouseProvider(mouse_position)),
            Arc::new(MockCompositorProbe(compositor_active)),
            blender.clone(),
            launch_mode,
        );

        Fixture {
            capturer,
            blender,
            grabber,
        }
    }

    fn default_fixture() -> Fixture {
        create_fixture(None, Ok((100, 100)), true, LaunchMode::Gui)
    }

    #[test]
    fn test_active_window_without_focus_falls_back_to_screen_under_cursor() {
        let mut fixture = create_fixture(None, Ok((2500, 700)), true, LaunchMode::Gui);

        let event = fixture
            .grabber
            .grab_image(CaptureMode::ActiveWindow, false, 0);

        assert!(matches!(event, GrabberEvent::ScheduleGrab { .. }));
        assert_eq!(fixture.grabber.capture_rect, RIGHT_SCREEN);
    }

    #[test]
    fn test_active_window_with_null_rect_falls_back_to_current_screen() {
        let mut fixture = create_fixture(
            Some(CaptureRect::new(10, 10, 0, 0)),
            Ok((50, 50)),
            true,
            LaunchMode::Gui,
        );

        fixture
            .grabber
            .grab_image(CaptureMode::ActiveWindow, false, 0);

        assert_eq!(fixture.grabber.capture_rect, LEFT_SCREEN);
    }

    #[test]
    fn test_active_window_uses_focused_window_rect() {
        let window_rect = CaptureRect::new(200, 150, 800, 600);
        let mut fixture = create_fixture(Some(window_rect), Ok((0, 0)), true, LaunchMode::Gui);

        fixture
            .grabber
            .grab_image(CaptureMode::ActiveWindow, false, 0);

        assert_eq!(fixture.grabber.capture_rect, window_rect);
    }

    #[test]
    fn test_current_screen_uses_origin_when_mouse_position_fails() {
        let mut fixture = create_fixture(
            None,
            Err("no pointer".to_string()),
            true,
            LaunchMode::Gui,
        );

        fixture
            .grabber
            .grab_image(CaptureMode::CurrentScreen, false, 0);

        assert_eq!(fixture.grabber.capture_rect, LEFT_SCREEN);
    }

    #[test]
    fn test_full_screen_targets_union_of_monitors() {
        let mut fixture = default_fixture();

        fixture.grabber.grab_image(CaptureMode::FullScreen, false, 0);

        assert_eq!(
            fixture.grabber.capture_rect,
            CaptureRect::new(0, 0, 4480, 1440)
        );
    }

    #[test]
    fn test_negative_delay_is_clamped_before_hide_buffer() {
        let mut fixture = default_fixture();

        let event = fixture
            .grabber
            .grab_image(CaptureMode::FullScreen, false, -500);

        match event {
            GrabberEvent::ScheduleGrab { delay } => {
                assert_eq!(delay, Duration::from_millis(WINDOW_HIDE_BUFFER_MS as u64))
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_short_gui_delay_gets_hide_buffer() {
        let mut fixture = default_fixture();

        fixture.grabber.grab_image(CaptureMode::FullScreen, false, 150);

        assert_eq!(fixture.grabber.delay(), Duration::from_millis(350));
    }

    #[test]
    fn test_long_gui_delay_is_used_unchanged() {
        let mut fixture = default_fixture();

        fixture
            .grabber
            .grab_image(CaptureMode::FullScreen, false, 2000);

        assert_eq!(fixture.grabber.delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_cli_delay_never_gets_hide_buffer() {
        let mut fixture = create_fixture(None, Ok((0, 0)), true, LaunchMode::Cli);

        fixture.grabber.grab_image(CaptureMode::FullScreen, false, 0);

        assert_eq!(fixture.grabber.delay(), Duration::ZERO);
    }

    #[test]
    fn test_unknown_mode_name_cancels() {
        let mut fixture = default_fixture();

        let event = fixture.grabber.grab_image_named("lasso", false, 0);

        assert!(matches!(event, GrabberEvent::Canceled));
        assert!(!fixture.grabber.is_capturing());
        assert!(fixture.capturer.grabbed().is_empty());
    }

    #[test]
    fn test_known_mode_name_starts_capture() {
        let mut fixture = default_fixture();

        let event = fixture.grabber.grab_image_named("current-screen", false, 0);

        assert!(matches!(event, GrabberEvent::ScheduleGrab { .. }));
        assert!(fixture.grabber.is_capturing());
    }

    #[test]
    fn test_rect_area_with_compositor_shows_overlay_without_background() {
        let mut fixture = create_fixture(None, Ok((0, 0)), true, LaunchMode::Gui);

        let event = fixture.grabber.grab_image(CaptureMode::RectArea, false, 0);

        match event {
            GrabberEvent::ShowSnippingArea { area, background } => {
                assert_eq!(area, LEFT_SCREEN.union(&RIGHT_SCREEN));
                assert!(background.is_none());
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(fixture.capturer.grabbed().is_empty());
    }

    #[test]
    fn test_rect_area_without_compositor_grabs_background() {
        let mut fixture = create_fixture(None, Ok((0, 0)), false, LaunchMode::Gui);

        let event = fixture.grabber.grab_image(CaptureMode::RectArea, false, 0);

        match event {
            GrabberEvent::ShowSnippingArea { background, .. } => {
                let background = background.expect("background should be grabbed");
                assert_eq!(background.width, 4480);
                assert_eq!(background.height, 1440);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(
            fixture.capturer.grabbed(),
            vec![LEFT_SCREEN.union(&RIGHT_SCREEN)]
        );
    }

    #[test]
    fn test_rect_area_with_failed_background_grab_shows_bare_overlay() {
        let capturer = Arc::new(MockScreenCapturer {
            fail_grab: true,
            ..MockScreenCapturer::default()
        });
        let mut grabber = ImageGrabber::build(
            capturer.clone(),
            Arc::new(MockGeometryProvider {
                active_window: None,
                fail_full_screen: false,
            }),
            Arc::new(MockMouseProvider(Ok((0, 0)))),
            Arc::new(MockCompositorProbe(false)),
            Arc::new(MockCursorBlender::default()),
            LaunchMode::Gui,
        );

        let event = grabber.grab_image(CaptureMode::RectArea, false, 0);

        match event {
            GrabberEvent::ShowSnippingArea { area, background } => {
                assert_eq!(area, LEFT_SCREEN.union(&RIGHT_SCREEN));
                assert!(background.is_none());
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(capturer.grabbed().len(), 1);
        assert!(grabber.is_capturing());
    }

    #[test]
    fn test_rect_area_without_geometry_cancels() {
        let mut grabber = ImageGrabber::build(
            Arc::new(MockScreenCapturer::default()),
            Arc::new(MockGeometryProvider {
                active_window: None,
                fail_full_screen: true,
            }),
            Arc::new(MockMouseProvider(Ok((0, 0)))),
            Arc::new(MockCompositorProbe(true)),
            Arc::new(MockCursorBlender::default()),
            LaunchMode::Gui,
        );

        let event = grabber.grab_image(CaptureMode::RectArea, false, 0);

        assert!(matches!(event, GrabberEvent::Canceled));
        assert!(!grabber.is_capturing());
    }

    #[test]
    fn test_area_selected_schedules_grab_of_selected_rect() {
        let mut fixture = default_fixture();
        let selected = CaptureRect::new(40, 30, 320, 200);

        fixture.grabber.grab_image(CaptureMode::RectArea, false, 1000);
        let event = fixture.grabber.area_selected(selected);

        match event {
            GrabberEvent::ScheduleGrab { delay } => {
                assert_eq!(delay, Duration::from_millis(1000))
            }
            other => panic!("unexpected event {:?}", other),
        }

        let buffer = fixture.grabber.prepare_grab().unwrap().execute().unwrap();
        assert_eq!(fixture.capturer.grabbed(), vec![selected]);
        assert_eq!((buffer.width, buffer.height), (320, 200));
    }

    #[test]
    fn test_area_canceled_ends_capture() {
        let mut fixture = default_fixture();

        fixture.grabber.grab_image(CaptureMode::RectArea, false, 0);
        let event = fixture.grabber.area_canceled();

        assert!(matches!(event, GrabberEvent::Canceled));
        assert!(!fixture.grabber.is_capturing());
        assert!(fixture.grabber.prepare_grab().is_err());
    }

    #[test]
    fn test_second_request_while_capturing_is_ignored() {
        let mut fixture = default_fixture();

        fixture.grabber.grab_image(CaptureMode::RectArea, false, 0);
        let event = fixture.grabber.grab_image(CaptureMode::FullScreen, false, 0);

        assert!(matches!(event, GrabberEvent::Ignored));
    }

    #[test]
    fn test_capture_completed_allows_next_capture() {
        let mut fixture = default_fixture();

        fixture.grabber.grab_image(CaptureMode::FullScreen, false, 0);
        fixture.grabber.capture_completed();
        let event = fixture
            .grabber
            .grab_image(CaptureMode::CurrentScreen, false, 0);

        assert!(matches!(event, GrabberEvent::ScheduleGrab { .. }));
    }

    #[test]
    fn test_grab_blends_cursor_only_when_requested() {
        let mut fixture = default_fixture();

        fixture.grabber.grab_image(CaptureMode::CurrentScreen, false, 0);
        fixture.grabber.prepare_grab().unwrap().execute().unwrap();
        assert_eq!(fixture.blender.calls.load(Ordering::SeqCst), 0);
        fixture.grabber.capture_completed();

        fixture.grabber.grab_image(CaptureMode::CurrentScreen, true, 0);
        fixture.grabber.prepare_grab().unwrap().execute().unwrap();
        assert_eq!(fixture.blender.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_grab_skips_cursor_when_position_unavailable() {
        let mut fixture = create_fixture(
            Some(CaptureRect::new(0, 0, 100, 100)),
            Err("no pointer".to_string()),
            true,
            LaunchMode::Gui,
        );

        fixture.grabber.grab_image(CaptureMode::ActiveWindow, true, 0);
        let result = fixture.grabber.prepare_grab().unwrap().execute();

        assert!(result.is_ok());
        assert_eq!(fixture.blender.calls.load(Ordering::SeqCst), 0);
    }
}
