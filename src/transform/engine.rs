//! Built-in transform engine backed by the `image` crate.
//!
//! Decoding, resampling, and encoding are CPU-bound, so the whole pipeline
//! runs on the blocking thread pool. The output format is chosen from the
//! destination extension, which mirrors the source extension.

use std::path::Path;

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};

use super::error::TransformError;
use super::TransformEngine;
use crate::params::TransformParams;

/// Resampling filter used for all resize operations
const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Transform engine that decodes, resizes, and re-encodes with `image`
#[derive(Debug, Default)]
pub struct ResizeEngine;

impl ResizeEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransformEngine for ResizeEngine {
    async fn transform(
        &self,
        source: &Path,
        destination: &Path,
        params: &TransformParams,
    ) -> Result<(), TransformError> {
        let source = source.to_path_buf();
        let destination = destination.to_path_buf();
        let params = params.clone();

        tokio::task::spawn_blocking(move || run_pipeline(&source, &destination, &params))
            .await
            .map_err(|e| TransformError::Aborted(e.to_string()))?
    }
}

fn run_pipeline(
    source: &Path,
    destination: &Path,
    params: &TransformParams,
) -> Result<(), TransformError> {
    let img = image::open(source).map_err(|e| TransformError::Decode {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let resized = apply_plan(img, params);
    let flattened = if params.flatten {
        flatten_image(resized, params.background.as_deref())
    } else {
        resized
    };

    encode_to(destination, flattened)
}

/// How the source dimensions map onto the target dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizePlan {
    /// No resize (no target, zero target, or enlargement suppressed)
    Keep,
    /// Resize to exactly width x height
    Exact(u32, u32),
    /// Fit within width x height, preserving aspect ratio
    Fit(u32, u32),
    /// Cover width x height, preserving aspect ratio, no crop
    Cover(u32, u32),
    /// Cover width x height, then center-crop to exactly that box
    CropCover(u32, u32),
}

/// Scale `other` by `target`/`source`, rounding and clamping to 1
fn scaled(other: u32, target: u32, source: u32) -> u32 {
    (((other as u64 * target as u64) + (source as u64 / 2)) / source as u64).max(1) as u32
}

fn plan(source_w: u32, source_h: u32, params: &TransformParams) -> ResizePlan {
    let both = params.width.is_some() && params.height.is_some();

    let (target_w, target_h) = match (params.width, params.height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scaled(source_h, w, source_w)),
        (None, Some(h)) => (scaled(source_w, h, source_h), h),
        (None, None) => return ResizePlan::Keep,
    };

    if target_w == 0 || target_h == 0 {
        return ResizePlan::Keep;
    }

    if params.without_enlargement && target_w >= source_w && target_h >= source_h {
        return ResizePlan::Keep;
    }

    if both && params.crop.is_some() {
        ResizePlan::CropCover(target_w, target_h)
    } else if both && params.max {
        ResizePlan::Fit(target_w, target_h)
    } else if both && params.min {
        ResizePlan::Cover(target_w, target_h)
    } else {
        ResizePlan::Exact(target_w, target_h)
    }
}

fn apply_plan(img: DynamicImage, params: &TransformParams) -> DynamicImage {
    match plan(img.width(), img.height(), params) {
        ResizePlan::Keep => img,
        ResizePlan::Exact(w, h) => img.resize_exact(w, h, RESIZE_FILTER),
        ResizePlan::Fit(w, h) => img.resize(w, h, RESIZE_FILTER),
        ResizePlan::Cover(w, h) => {
            let scale = f64::max(
                w as f64 / img.width() as f64,
                h as f64 / img.height() as f64,
            );
            let cover_w = ((img.width() as f64 * scale).round() as u32).max(w);
            let cover_h = ((img.height() as f64 * scale).round() as u32).max(h);
            img.resize_exact(cover_w, cover_h, RESIZE_FILTER)
        }
        ResizePlan::CropCover(w, h) => img.resize_to_fill(w, h, RESIZE_FILTER),
    }
}

/// Composite alpha over a background color, producing an opaque image
fn flatten_image(img: DynamicImage, background: Option<&str>) -> DynamicImage {
    let bg = parse_background(background);
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = RgbImage::new(width, height);
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = px[3] as u32;
        let blend =
            |fg: u8, back: u8| (((fg as u32 * alpha) + (back as u32 * (255 - alpha))) / 255) as u8;
        out.put_pixel(
            x,
            y,
            image::Rgb([
                blend(px[0], bg[0]),
                blend(px[1], bg[1]),
                blend(px[2], bg[2]),
            ]),
        );
    }

    DynamicImage::ImageRgb8(out)
}

/// Parse a `#rrggbb` / `rrggbb` color spec, defaulting to white
fn parse_background(spec: Option<&str>) -> [u8; 3] {
    if let Some(s) = spec {
        let hex = s.trim_start_matches('#');
        if hex.len() == 6 {
            if let Ok(v) = u32::from_str_radix(hex, 16) {
                return [(v >> 16) as u8, (v >> 8) as u8, v as u8];
            }
        }
    }
    [255, 255, 255]
}

fn encode_to(destination: &Path, img: DynamicImage) -> Result<(), TransformError> {
    let format = ImageFormat::from_path(destination).map_err(|e| TransformError::Encode {
        path: destination.to_path_buf(),
        message: e.to_string(),
    })?;

    // JPEG has no alpha channel
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.into_rgb8()),
        _ => img,
    };

    img.save_with_format(destination, format)
        .map_err(|e| TransformError::Encode {
            path: destination.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TransformParams {
        TransformParams::default()
    }

    #[test]
    fn test_plan_no_dimensions_keeps() {
        assert_eq!(plan(800, 600, &params()), ResizePlan::Keep);
    }

    #[test]
    fn test_plan_width_only_preserves_aspect() {
        let mut p = params();
        p.width = Some(400);
        assert_eq!(plan(800, 600, &p), ResizePlan::Exact(400, 300));
    }

    #[test]
    fn test_plan_height_only_preserves_aspect() {
        let mut p = params();
        p.height = Some(300);
        assert_eq!(plan(800, 600, &p), ResizePlan::Exact(400, 300));
    }

    #[test]
    fn test_plan_both_dimensions_exact() {
        let mut p = params();
        p.width = Some(100);
        p.height = Some(100);
        assert_eq!(plan(800, 600, &p), ResizePlan::Exact(100, 100));
    }

    #[test]
    fn test_plan_max_fits_within_box() {
        let mut p = params();
        p.width = Some(100);
        p.height = Some(100);
        p.max = true;
        assert_eq!(plan(800, 600, &p), ResizePlan::Fit(100, 100));
    }

    #[test]
    fn test_plan_min_covers_box() {
        let mut p = params();
        p.width = Some(100);
        p.height = Some(100);
        p.min = true;
        assert_eq!(plan(800, 600, &p), ResizePlan::Cover(100, 100));
    }

    #[test]
    fn test_plan_crop_covers_and_crops() {
        let mut p = params();
        p.width = Some(100);
        p.height = Some(100);
        p.crop = Some("centre".to_string());
        assert_eq!(plan(800, 600, &p), ResizePlan::CropCover(100, 100));
    }

    #[test]
    fn test_plan_without_enlargement_suppresses_upscale() {
        let mut p = params();
        p.width = Some(1600);
        p.without_enlargement = true;
        assert_eq!(plan(800, 600, &p), ResizePlan::Keep);

        p.without_enlargement = false;
        assert_eq!(plan(800, 600, &p), ResizePlan::Exact(1600, 1200));
    }

    #[test]
    fn test_plan_zero_dimension_keeps() {
        let mut p = params();
        p.width = Some(0);
        assert_eq!(plan(800, 600, &p), ResizePlan::Keep);
    }

    #[test]
    fn test_parse_background_hex() {
        assert_eq!(parse_background(Some("#336699")), [0x33, 0x66, 0x99]);
        assert_eq!(parse_background(Some("336699")), [0x33, 0x66, 0x99]);
        assert_eq!(parse_background(Some("not-a-color")), [255, 255, 255]);
        assert_eq!(parse_background(None), [255, 255, 255]);
    }

    #[test]
    fn test_flatten_blends_over_background() {
        let mut rgba = image::RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
        let flattened = flatten_image(DynamicImage::ImageRgba8(rgba), Some("#ff0000"));
        assert_eq!(flattened.to_rgb8().get_pixel(0, 0).0, [255, 0, 0]);
    }
}
