use anyhow::{Context, Result};
use iced::widget::image;

#[derive(Clone)]
pub struct CaptureBuffer {
    pub scale_factor: f64,
    pub image_handle: image::Handle,
    pub width: u32,
    pub height: u32,
    raw_data: Vec<u8>,
}

impl std::fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("scale_factor", &self.scale_factor)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl CaptureBuffer {
    pub fn build_from_raw_data(
        scale_factor: f64,
        width_pixels: u32,
        height_pixels: u32,
        raw_rgba_data: Vec<u8>,
    ) -> Self {
        log::debug!(
            "[CAPTURE_BUFFER] building buffer: {}x{}, scale={}",
            width_pixels,
            height_pixels,
            scale_factor
        );

        Self {
            scale_factor,
            image_handle: image::Handle::from_rgba(
                width_pixels,
                height_pixels,
                raw_rgba_data.clone(),
            ),
            width: width_pixels,
            height: height_pixels,
            raw_data: raw_rgba_data,
        }
    }

    pub fn build_from_rgba_image(scale_factor: f64, rgba_image: ::image::RgbaImage) -> Self {
        let (width_pixels, height_pixels) = rgba_image.dimensions();
        Self::build_from_raw_data(
            scale_factor,
            width_pixels,
            height_pixels,
            rgba_image.into_raw(),
        )
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn to_rgba_image(&self) -> Result<::image::RgbaImage> {
        ::image::RgbaImage::from_raw(self.width, self.height, self.raw_data.clone())
            .with_context(|| {
                format!(
                    "raw data of {} bytes does not fit a {}x{} RGBA image",
                    self.raw_data.len(),
                    self.width,
                    self.height
                )
            })
    }
}
