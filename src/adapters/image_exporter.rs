use std::borrow::Cow;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::core::models::{CaptureBuffer, UserSettings};
use crate::global_constants::{DEFAULT_FILENAME_PATTERN, LOG_TAG_EXPORT};

pub struct ImageExporter;

impl ImageExporter {
    /// Expands the strftime pattern and makes sure the name ends in `.png`.
    pub fn build_file_name(pattern: &str, timestamp: DateTime<Local>) -> String {
        let mut file_name = String::new();
        if pattern.trim().is_empty() || write!(file_name, "{}", timestamp.format(pattern)).is_err()
        {
            log::warn!(
                "{} invalid filename pattern '{}', using default",
                LOG_TAG_EXPORT,
                pattern
            );
            file_name.clear();
            let _ = write!(file_name, "{}", timestamp.format(DEFAULT_FILENAME_PATTERN));
        }

        if !file_name.to_ascii_lowercase().ends_with(".png") {
            file_name.push_str(".png");
        }
        file_name
    }

    pub fn default_save_path(settings: &UserSettings) -> PathBuf {
        settings
            .resolve_save_directory()
            .join(Self::build_file_name(&settings.filename_pattern, Local::now()))
    }

    pub fn save_png(buffer: &CaptureBuffer, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create directory {:?}", parent))?;
        }

        let path = if path.extension().is_none() {
            path.with_extension("png")
        } else {
            path.to_path_buf()
        };

        buffer
            .to_rgba_image()?
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("Unable to write screenshot to {:?}", path))?;

        log::info!(
            "{} saved {}x{} screenshot to {:?}",
            LOG_TAG_EXPORT,
            buffer.width,
            buffer.height,
            path
        );
        Ok(path)
    }

    pub fn copy_to_clipboard(buffer: &CaptureBuffer) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Unable to open clipboard")?;
        clipboard
            .set_image(arboard::ImageData {
                width: buffer.width as usize,
                height: buffer.height as usize,
                bytes: Cow::Borrowed(buffer.raw_data()),
            })
            .context("Unable to copy screenshot to clipboard")?;

        log::info!(
            "{} copied {}x{} screenshot to clipboard",
            LOG_TAG_EXPORT,
            buffer.width,
            buffer.height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_build_file_name_expands_default_pattern() {
        let file_name = ImageExporter::build_file_name(DEFAULT_FILENAME_PATTERN, fixed_timestamp());

        assert_eq!(file_name, "snipgrab_20260314-092653.png");
    }

    #[test]
    fn test_build_file_name_appends_png_extension() {
        let file_name = ImageExporter::build_file_name("shot_%H%M", fixed_timestamp());

        assert_eq!(file_name, "shot_0926.png");
    }

    #[test]
    fn test_build_file_name_falls_back_on_empty_pattern() {
        let file_name = ImageExporter::build_file_name("  ", fixed_timestamp());

        assert_eq!(file_name, "snipgrab_20260314-092653.png");
    }

    #[test]
    fn test_save_png_writes_readable_image() {
        let temp_dir = std::env::temp_dir().join("snipgrab-export-test");
        let path = temp_dir.join("nested").join("capture");
        let buffer = CaptureBuffer::build_from_raw_data(1.0, 3, 2, [10, 20, 30, 255].repeat(6));

        let saved_path = ImageExporter::save_png(&buffer, &path).unwrap();

        assert_eq!(saved_path.extension().and_then(|ext| ext.to_str()), Some("png"));
        let reloaded = image::open(&saved_path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (3, 2));
        assert_eq!(reloaded.get_pixel(2, 1).0, [10, 20, 30, 255]);

        std::fs::remove_dir_all(&temp_dir).ok();
    }
}
