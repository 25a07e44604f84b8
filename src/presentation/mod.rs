pub mod app_theme;
mod color_combo_box;
mod snipping_area;

pub use color_combo_box::{ColorComboBox, ColorEntry};
pub use snipping_area::{SnippingArea, SnippingAreaEvent, SnippingAreaMessage};
