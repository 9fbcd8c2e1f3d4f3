//! Pixmap conversion and region rendering

use std::io::Cursor;

use image::{DynamicImage, RgbaImage};
use mupdf::{Colorspace, Matrix, Page, Pixmap};

use crate::document::{DocumentError, DocumentResult, RenderedImage};
use crate::geometry::Rect;

/// Convert a MuPDF pixmap to an RGBA image buffer
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> DocumentResult<RgbaImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize; // components per pixel

    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    RgbaImage::from_raw(width, height, rgba_buffer)
        .ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))
}

/// Encode an image as PNG
pub fn encode_png(img: &DynamicImage) -> DocumentResult<RenderedImage> {
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(RenderedImage {
        png,
        width: img.width(),
        height: img.height(),
    })
}

/// Pixel window of `clip` inside a page rendered at `multiplier`
///
/// Returns `None` when the window is empty after clamping to the raster.
pub fn pixel_window(
    page_bounds: &Rect,
    clip: &Rect,
    multiplier: f32,
    raster_width: u32,
    raster_height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let to_px = |v: f32, max: u32| -> u32 { (v.max(0.0) as u32).min(max) };

    let x0 = to_px(((clip.x0 - page_bounds.x0) * multiplier).floor(), raster_width);
    let y0 = to_px(((clip.y0 - page_bounds.y0) * multiplier).floor(), raster_height);
    let x1 = to_px(((clip.x1 - page_bounds.x0) * multiplier).ceil(), raster_width);
    let y1 = to_px(((clip.y1 - page_bounds.y0) * multiplier).ceil(), raster_height);

    if x1 > x0 && y1 > y0 {
        Some((x0, y0, x1 - x0, y1 - y0))
    } else {
        None
    }
}

/// Render `clip` of a page at `multiplier` and encode it as PNG
pub fn render_clip(page: &Page, clip: &Rect, multiplier: f32) -> DocumentResult<RenderedImage> {
    let bounds = Rect::from(page.bounds()?);

    let matrix = Matrix::new_scale(multiplier, multiplier);
    let colorspace = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&matrix, &colorspace, false, false)?;
    let rgba = pixmap_to_rgba(&pixmap)?;

    let (x, y, w, h) = pixel_window(&bounds, clip, multiplier, rgba.width(), rgba.height())
        .ok_or_else(|| DocumentError::RenderError(format!("Empty render window for {}", clip)))?;

    let cropped = DynamicImage::ImageRgba8(rgba).crop_imm(x, y, w, h);
    encode_png(&cropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_window_scales_and_rounds_outward() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        let clip = Rect::new(10.2, 20.7, 30.1, 40.0);
        let window = pixel_window(&page, &clip, 2.0, 200, 200);
        assert_eq!(window, Some((20, 41, 41, 39)));
    }

    #[test]
    fn test_pixel_window_clamps_to_raster() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        let clip = Rect::new(90.0, 90.0, 120.0, 120.0);
        assert_eq!(pixel_window(&page, &clip, 1.0, 100, 100), Some((90, 90, 10, 10)));

        let outside = Rect::new(150.0, 150.0, 160.0, 160.0);
        assert_eq!(pixel_window(&page, &outside, 1.0, 100, 100), None);
    }

    #[test]
    fn test_encode_png_reports_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(7, 3));
        let rendered = encode_png(&img).unwrap();
        assert_eq!((rendered.width, rendered.height), (7, 3));
        assert!(rendered.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
