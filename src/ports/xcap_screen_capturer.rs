use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::core::models::{CaptureBuffer, CaptureRect};
use crate::core::ports::{ScreenCapturer, ScreenGeometryProvider};
use crate::global_constants::{
    ERROR_CONTEXT_CAPTURE_MONITOR, ERROR_CONTEXT_LIST_MONITORS, ERROR_CONTEXT_LIST_WINDOWS,
    LOG_TAG_CAPTURE,
};

pub struct XcapScreenCapturer;

/// The part of one monitor's screenshot that falls inside the requested rect.
struct MonitorPiece {
    monitor_rect: CaptureRect,
    overlap: CaptureRect,
    image: RgbaImage,
}

impl MonitorPiece {
    /// Physical pixels per desktop unit on this monitor.
    fn pixel_ratio(&self) -> f64 {
        if self.monitor_rect.width == 0 {
            return 1.0;
        }
        self.image.width() as f64 / self.monitor_rect.width as f64
    }
}

fn scale_length(length: u32, ratio: f64) -> u32 {
    ((length as f64) * ratio).round().max(1.0) as u32
}

fn scale_offset(offset: i32, ratio: f64) -> i64 {
    ((offset as f64) * ratio).round() as i64
}

impl XcapScreenCapturer {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap screen capturer", LOG_TAG_CAPTURE);
        Self
    }

    fn list_monitors(&self) -> Result<Vec<xcap::Monitor>> {
        xcap::Monitor::all().with_context(|| ERROR_CONTEXT_LIST_MONITORS)
    }

    fn monitor_rect(monitor: &xcap::Monitor) -> Result<CaptureRect> {
        Ok(CaptureRect::new(
            monitor.x()?,
            monitor.y()?,
            monitor.width()?,
            monitor.height()?,
        ))
    }

    fn capture_monitor_image(&self, monitor: &xcap::Monitor) -> Result<RgbaImage> {
        monitor
            .capture_image()
            .with_context(|| ERROR_CONTEXT_CAPTURE_MONITOR)
    }

    fn window_rect(window: &xcap::Window) -> Result<CaptureRect> {
        Ok(CaptureRect::new(
            window.x()?,
            window.y()?,
            window.width()?,
            window.height()?,
        ))
    }

    /// Stitches monitor pieces into one image covering `rect`, at the highest pixel ratio
    /// among the pieces.
    fn compose_monitor_pieces(rect: &CaptureRect, pieces: &[MonitorPiece]) -> (RgbaImage, f64) {
        let target_ratio = pieces
            .iter()
            .map(MonitorPiece::pixel_ratio)
            .fold(0.0_f64, f64::max);
        let target_ratio = if target_ratio > 0.0 { target_ratio } else { 1.0 };

        let mut canvas = RgbaImage::new(
            scale_length(rect.width, target_ratio),
            scale_length(rect.height, target_ratio),
        );

        for piece in pieces {
            let source_ratio = piece.pixel_ratio();
            let source_x = scale_offset(piece.overlap.x - piece.monitor_rect.x, source_ratio);
            let source_y = scale_offset(piece.overlap.y - piece.monitor_rect.y, source_ratio);

            let cropped = imageops::crop_imm(
                &piece.image,
                source_x.max(0) as u32,
                source_y.max(0) as u32,
                scale_length(piece.overlap.width, source_ratio),
                scale_length(piece.overlap.height, source_ratio),
            )
            .to_image();

            let target_width = scale_length(piece.overlap.width, target_ratio);
            let target_height = scale_length(piece.overlap.height, target_ratio);
            let placed = if cropped.dimensions() == (target_width, target_height) {
                cropped
            } else {
                imageops::resize(&cropped, target_width, target_height, FilterType::Triangle)
            };

            imageops::replace(
                &mut canvas,
                &placed,
                scale_offset(piece.overlap.x - rect.x, target_ratio),
                scale_offset(piece.overlap.y - rect.y, target_ratio),
            );
        }

        (canvas, target_ratio)
    }
}

impl ScreenCapturer for XcapScreenCapturer {
    fn grab_rect(&self, rect: &CaptureRect) -> Result<CaptureBuffer> {
        log::debug!("{} grabbing {}", LOG_TAG_CAPTURE, rect);

        if rect.is_null() {
            anyhow::bail!("Cannot grab empty rect {}", rect);
        }

        let mut pieces = Vec::new();
        for monitor in self.list_monitors()? {
            let monitor_rect = Self::monitor_rect(&monitor)?;
            let Some(overlap) = monitor_rect.intersection(rect) else {
                continue;
            };

            let image = self.capture_monitor_image(&monitor)?;
            pieces.push(MonitorPiece {
                monitor_rect,
                overlap,
                image,
            });
        }

        if pieces.is_empty() {
            anyhow::bail!("No monitor intersects {}", rect);
        }

        let (image, scale_factor) = Self::compose_monitor_pieces(rect, &pieces);

        log::info!(
            "{} captured {}x{} screenshot from {} monitor(s), scale_factor={}",
            LOG_TAG_CAPTURE,
            image.width(),
            image.height(),
            pieces.len(),
            scale_factor
        );

        Ok(CaptureBuffer::build_from_rgba_image(scale_factor, image))
    }
}

impl ScreenGeometryProvider for XcapScreenCapturer {
    fn full_screen_rect(&self) -> Result<CaptureRect> {
        let mut full_screen_rect = CaptureRect::default();
        for monitor in self.list_monitors()? {
            full_screen_rect = full_screen_rect.union(&Self::monitor_rect(&monitor)?);
        }

        if full_screen_rect.is_null() {
            anyhow::bail!("No monitors found");
        }

        log::debug!("{} full screen rect: {}", LOG_TAG_CAPTURE, full_screen_rect);
        Ok(full_screen_rect)
    }

    fn screen_rect_at(&self, x_position: i32, y_position: i32) -> Result<CaptureRect> {
        match xcap::Monitor::from_point(x_position, y_position) {
            Ok(monitor) => Self::monitor_rect(&monitor),
            Err(error) => {
                log::warn!(
                    "{} no monitor at ({}, {}), using primary: {}",
                    LOG_TAG_CAPTURE,
                    x_position,
                    y_position,
                    error
                );
                let primary = self
                    .list_monitors()?
                    .into_iter()
                    .find(|monitor| monitor.is_primary().unwrap_or(false))
                    .context("No primary monitor found")?;
                Self::monitor_rect(&primary)
            }
        }
    }

    fn active_window_rect(&self) -> Result<Option<CaptureRect>> {
        let own_pid = std::process::id();
        let windows = xcap::Window::all().with_context(|| ERROR_CONTEXT_LIST_WINDOWS)?;

        let focused_window = windows.into_iter().find(|window| {
            window.is_focused().unwrap_or(false)
                && !window.is_minimized().unwrap_or(false)
                && window.pid().map(|pid| pid != own_pid).unwrap_or(true)
        });

        let Some(window) = focused_window else {
            return Ok(None);
        };

        let rect = Self::window_rect(&window)?;
        log::debug!(
            "{} focused window '{}' at {}",
            LOG_TAG_CAPTURE,
            window.title().unwrap_or_default(),
            rect
        );
        Ok(Some(rect))
    }
}
