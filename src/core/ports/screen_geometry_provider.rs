use anyhow::Result;

use crate::core::models::CaptureRect;

pub trait ScreenGeometryProvider: Send + Sync {
    /// Union of all monitor rects.
    fn full_screen_rect(&self) -> Result<CaptureRect>;

    fn screen_rect_at(&self, x_position: i32, y_position: i32) -> Result<CaptureRect>;

    /// Rect of the focused window, `None` when no window has focus.
    fn active_window_rect(&self) -> Result<Option<CaptureRect>>;
}
