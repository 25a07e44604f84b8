#![allow(dead_code)]

pub const APPLICATION_NAME: &str = "snipgrab";
pub const APPLICATION_TITLE: &str = "snipgrab - Screenshot Tool";
pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const LOG_TAG_APP: &str = "[APP]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_GRABBER: &str = "[GRABBER]";
pub const LOG_TAG_KEYBOARD: &str = "[KEYBOARD]";
pub const LOG_TAG_COMPOSITOR: &str = "[COMPOSITOR]";
pub const LOG_TAG_EXPORT: &str = "[EXPORT]";

pub const MESSAGE_MOUSE_POSITION_FAILED: &str = "failed to get mouse position, using (0,0)";
pub const MESSAGE_NO_FOCUSED_WINDOW: &str = "found no window with focus";
pub const MESSAGE_UNKNOWN_CAPTURE_MODE: &str = "unknown capture mode provided";
pub const MESSAGE_KEYBOARD_CAPTURE_HOTKEY: &str = "PrintScreen pressed - starting capture";
pub const MESSAGE_KEYBOARD_ESCAPE_PRESSED: &str = "Escape pressed - canceling";

pub const ERROR_CONTEXT_CAPTURE_MONITOR: &str = "Unable to capture monitor";
pub const ERROR_CONTEXT_LIST_MONITORS: &str = "Unable to list monitors";
pub const ERROR_CONTEXT_LIST_WINDOWS: &str = "Unable to list windows";

/// Delays at or above this value are used as-is.
pub const MIN_CAPTURE_DELAY_MS: i64 = 200;
/// Added to shorter delays so the main window has time to hide.
pub const WINDOW_HIDE_BUFFER_MS: i64 = 200;

pub const DEFAULT_MOUSE_POSITION_X: i32 = 0;
pub const DEFAULT_MOUSE_POSITION_Y: i32 = 0;

pub const DEFAULT_FILENAME_PATTERN: &str = "snipgrab_%Y%m%d-%H%M%S.png";
pub const DEFAULT_SNIPPING_FRAME_COLOR: &str = "dodgerblue";
pub const SETTINGS_DIRECTORY_NAME: &str = "snipgrab";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const FRAME_COLOR_NAMES: &[&str] = &[
    "dodgerblue",
    "red",
    "orange",
    "yellow",
    "limegreen",
    "magenta",
    "white",
    "black",
];

pub const SNIPPING_DIM_RGBA: (f32, f32, f32, f32) = (0.0, 0.0, 0.0, 0.35);
pub const SNIPPING_BACKGROUND_DIM_RGBA: (f32, f32, f32, f32) = (0.0, 0.0, 0.0, 0.5);

pub const TRAY_POLL_INTERVAL_MS: u64 = 100;

pub const CLI_EXIT_CODE_FAILED: i32 = 1;
pub const CLI_EXIT_CODE_USAGE: i32 = 2;
pub const CLI_EXIT_CODE_CANCELED: i32 = 3;

pub const USAGE: &str = r#"Usage: snipgrab [OPTIONS]

Without a capture option the main window is shown.

Capture options (run without a window, save and exit):
  -r, --rectarea         Select a rectangular area to capture
  -f, --fullscreen       Capture the full screen (all monitors)
  -m, --current          Capture the screen under the mouse cursor
  -a, --active           Capture the window that currently has focus
      --mode <NAME>      Capture mode by name (rect-area, full-screen, current-screen, active-window)

Other options:
  -d, --delay <SECONDS>  Wait before capturing
  -c, --cursor           Include the mouse cursor in the screenshot
  -p, --path <FILE>      Where to save the screenshot
  -h, --help             Print this help
  -v, --version          Print the version

Exit status: 0 saved, 1 capture or save failed, 2 bad arguments, 3 capture canceled.
"#;
