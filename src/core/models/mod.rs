mod capture_buffer;
mod capture_mode;
mod capture_rect;
mod user_settings;

pub use capture_buffer::CaptureBuffer;
pub use capture_mode::{CaptureMode, UnknownCaptureMode};
pub use capture_rect::CaptureRect;
pub use user_settings::{ThemeMode, UserSettings};

/// How the application was launched. CLI captures have no main window to hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Gui,
    Cli,
}
