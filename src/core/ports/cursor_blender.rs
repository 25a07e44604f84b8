use anyhow::Result;

use crate::core::models::{CaptureBuffer, CaptureRect};

pub trait CursorBlender: Send + Sync {
    /// Paints the cursor at desktop position `cursor` onto a buffer that was grabbed from
    /// `capture_rect`.
    fn blend_cursor(
        &self,
        buffer: CaptureBuffer,
        capture_rect: &CaptureRect,
        cursor: (i32, i32),
    ) -> Result<CaptureBuffer>;
}
