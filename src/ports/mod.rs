mod keyboard_listener;
mod mouse_position_provider;
mod process_compositor_probe;
mod system_tray;
mod xcap_screen_capturer;

pub use keyboard_listener::{GlobalKeyboardEvent, GlobalKeyboardListener};
pub use mouse_position_provider::SystemMousePositionProvider;
pub use process_compositor_probe::ProcessCompositorProbe;
pub use system_tray::{SystemTray, TrayEvent};
pub use xcap_screen_capturer::XcapScreenCapturer;
