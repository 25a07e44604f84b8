use anyhow::Result;

use crate::core::models::{CaptureBuffer, CaptureRect};

pub trait ScreenCapturer: Send + Sync {
    /// Grabs the pixels inside `rect`, which may span several monitors.
    fn grab_rect(&self, rect: &CaptureRect) -> Result<CaptureBuffer>;
}
