mod arrow_cursor_blender;
mod image_exporter;
pub mod macos_permissions;

pub use arrow_cursor_blender::ArrowCursorBlender;
pub use image_exporter::ImageExporter;
