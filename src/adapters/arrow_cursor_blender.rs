use anyhow::Result;
use image::Rgba;

use crate::core::models::{CaptureBuffer, CaptureRect};
use crate::core::ports::CursorBlender;

// 'X' outline, '.' fill, hotspot at the top-left corner.
const ARROW_CURSOR: &[&str] = &[
    "X           ",
    "XX          ",
    "X.X         ",
    "X..X        ",
    "X...X       ",
    "X....X      ",
    "X.....X     ",
    "X......X    ",
    "X.......X   ",
    "X........X  ",
    "X.........X ",
    "X..........X",
    "X......XXXXX",
    "X...X..X    ",
    "X..XX..X    ",
    "X.X  X..X   ",
    "XX   X..X   ",
    "X     X..X  ",
    "      X..X  ",
    "       XX   ",
];

const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FILL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Paints a classic arrow pointer, scaled to the buffer's pixel density.
/// The shape is a built-in bitmap, not the system cursor image.
pub struct ArrowCursorBlender;

impl ArrowCursorBlender {
    pub fn initialize() -> Self {
        Self
    }
}

impl CursorBlender for ArrowCursorBlender {
    fn blend_cursor(
        &self,
        buffer: CaptureBuffer,
        capture_rect: &CaptureRect,
        cursor: (i32, i32),
    ) -> Result<CaptureBuffer> {
        if !capture_rect.contains_point(cursor.0, cursor.1) {
            log::debug!(
                "[CURSOR] cursor at ({}, {}) is outside {}, nothing to blend",
                cursor.0,
                cursor.1,
                capture_rect
            );
            return Ok(buffer);
        }

        let pixel_ratio = if capture_rect.width == 0 {
            1.0
        } else {
            buffer.width as f64 / capture_rect.width as f64
        };
        let block_size = pixel_ratio.round().max(1.0) as i64;
        let origin_x = ((cursor.0 - capture_rect.x) as f64 * pixel_ratio).round() as i64;
        let origin_y = ((cursor.1 - capture_rect.y) as f64 * pixel_ratio).round() as i64;

        let mut image = buffer.to_rgba_image()?;
        let (image_width, image_height) = (image.width() as i64, image.height() as i64);

        for (row_index, row) in ARROW_CURSOR.iter().enumerate() {
            for (column_index, symbol) in row.chars().enumerate() {
                let color = match symbol {
                    'X' => OUTLINE_COLOR,
                    '.' => FILL_COLOR,
                    _ => continue,
                };

                let block_x = origin_x + column_index as i64 * block_size;
                let block_y = origin_y + row_index as i64 * block_size;
                for y in block_y..(block_y + block_size) {
                    for x in block_x..(block_x + block_size) {
                        if x >= 0 && y >= 0 && x < image_width && y < image_height {
                            image.put_pixel(x as u32, y as u32, color);
                        }
                    }
                }
            }
        }

        Ok(CaptureBuffer::build_from_rgba_image(buffer.scale_factor, image))
    }
}
