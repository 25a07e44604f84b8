mod compositor_probe;
mod cursor_blender;
mod mouse_position_provider;
mod screen_capturer;
mod screen_geometry_provider;

pub use compositor_probe::CompositorProbe;
pub use cursor_blender::CursorBlender;
pub use mouse_position_provider::MousePositionProvider;
pub use screen_capturer::ScreenCapturer;
pub use screen_geometry_provider::ScreenGeometryProvider;
