//! Image preparation before recognition

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::OcrError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    /// Images with more pixels than this are downscaled
    pub max_pixels: u64,
    /// Longest side after downscaling
    pub max_dimension: u32,
    /// Contrast factor for the enhanced variant, 1.0 = unchanged
    pub contrast_factor: f32,
    /// Images with a side shorter than this get an upscaled variant
    pub small_side: u32,
    /// Minimum factor for the upscaled variant
    pub min_upscale: f32,
    /// Minimum size for the last-resort fallback image
    pub fallback_min_width: u32,
    pub fallback_min_height: u32,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            max_pixels: 4_000_000,
            max_dimension: 2000,
            contrast_factor: 2.0,
            small_side: 100,
            min_upscale: 2.0,
            fallback_min_width: 100,
            fallback_min_height: 30,
        }
    }
}

/// Named image handed to the engine
#[derive(Debug, Clone)]
pub struct ImageVariant {
    pub name: &'static str,
    pub image: DynamicImage,
}

impl ImageVariant {
    fn new(name: &'static str, image: DynamicImage) -> Self {
        Self { name, image }
    }
}

/// Decode candidate bytes
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, OcrError> {
    image::load_from_memory(bytes).map_err(|e| OcrError::ImageDecode(e.to_string()))
}

/// Downscale oversized images so the longer side fits `max_dimension`
pub fn limit_size(img: DynamicImage, settings: &PreprocessSettings) -> DynamicImage {
    let (w, h) = img.dimensions();
    if u64::from(w) * u64::from(h) <= settings.max_pixels || w == 0 || h == 0 {
        return img;
    }

    let max = settings.max_dimension as f32;
    let ratio = (max / w as f32).min(max / h as f32);
    let new_w = ((w as f32 * ratio) as u32).max(1);
    let new_h = ((h as f32 * ratio) as u32).max(1);
    warn!(width = w, height = h, new_width = new_w, new_height = new_h, "Image too large, resizing");
    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}

/// Scale contrast around the mean grey level
pub fn enhance_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let pixels = (u64::from(gray.width()) * u64::from(gray.height())).max(1) as f32;
    let mean = gray.pixels().map(|p| p.0[0] as f32).sum::<f32>() / pixels;

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0] as f32;
        let out = mean + factor * (v - mean);
        Luma([out.round().clamp(0.0, 255.0) as u8])
    })
}

/// Upscaled copy when a side is shorter than `small_side`
fn upscale_small(img: &DynamicImage, settings: &PreprocessSettings) -> Option<DynamicImage> {
    let (w, h) = img.dimensions();
    let min_side = w.min(h);
    if min_side == 0 || min_side >= settings.small_side {
        return None;
    }
    let scale = settings.min_upscale.max(settings.small_side as f32 / min_side as f32);
    let new_w = (w as f32 * scale) as u32;
    let new_h = (h as f32 * scale) as u32;
    Some(img.resize_exact(new_w, new_h, FilterType::Lanczos3))
}

/// Variants tried in the thorough configuration search, original first
pub fn variants(img: &DynamicImage, settings: &PreprocessSettings) -> Vec<ImageVariant> {
    let mut out = vec![ImageVariant::new("original", img.clone())];

    let gray = img.to_luma8();
    if !matches!(img, DynamicImage::ImageLuma8(_)) {
        out.push(ImageVariant::new("grayscale", DynamicImage::ImageLuma8(gray.clone())));
    }
    out.push(ImageVariant::new(
        "contrast",
        DynamicImage::ImageLuma8(enhance_contrast(&gray, settings.contrast_factor)),
    ));

    if let Some(resized) = upscale_small(img, settings) {
        out.push(ImageVariant::new("resized", resized));
    }

    out
}

/// Grayscale plus upscaling to the fallback minimum size
pub fn minimal(img: &DynamicImage, settings: &PreprocessSettings) -> DynamicImage {
    let gray = DynamicImage::ImageLuma8(img.to_luma8());
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 || (w >= settings.fallback_min_width && h >= settings.fallback_min_height) {
        return gray;
    }
    let scale = (settings.fallback_min_width as f32 / w as f32)
        .max(settings.fallback_min_height as f32 / h as f32);
    gray.resize_exact(
        (w as f32 * scale) as u32,
        (h as f32 * scale) as u32,
        FilterType::Lanczos3,
    )
}
