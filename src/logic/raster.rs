// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Rasterization of rendered cards into pixel images.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use thiserror::Error;

/// Failures while turning an SVG document into pixels.
#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("card markup could not be parsed: {0}")]
    Parse(String),
    #[error("scale must be a positive number, got {0}")]
    InvalidScale(f32),
    #[error("cannot allocate a {width}x{height} canvas")]
    Allocation { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Knobs for a single rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// Output pixels per SVG user unit.
    pub scale: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Straight-alpha RGBA8 bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, not premultiplied.
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, RasterizeError> {
        let img = RgbaImage::from_raw(self.width, self.height, self.rgba.clone()).ok_or(
            RasterizeError::Allocation {
                width: self.width,
                height: self.height,
            },
        )?;
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| RasterizeError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Capability that captures a rendered card region into a bitmap.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, svg: &str, options: RasterOptions) -> Result<RasterImage, RasterizeError>;
}

/// `resvg`-backed rasterizer.
///
/// Only `data:` images are honored; file or network references resolve to nothing.
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// Build a rasterizer with the system fonts loaded once up front.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} font faces for card rendering", db.len());
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterizer without any fonts; text is skipped.
    #[cfg(test)]
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, svg: &str, options: RasterOptions) -> Result<RasterImage, RasterizeError> {
        let scale = options.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RasterizeError::InvalidScale(scale));
        }

        let mut opt = usvg::Options::default();
        opt.fontdb = self.fontdb.clone();
        opt.image_href_resolver.resolve_string = Box::new(|_, _| None);

        let tree = usvg::Tree::from_str(svg, &opt)
            .map_err(|e| RasterizeError::Parse(e.to_string()))?;

        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(RasterizeError::Allocation { width, height })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        log::debug!("Rasterized card at {scale}x into {width}x{height}");
        Ok(RasterImage {
            width,
            height,
            rgba,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect width="10" height="20" fill="#ff0000"/></svg>"##;

    #[test]
    fn scales_output_dimensions() {
        let img = SvgRasterizer::without_fonts()
            .rasterize(SQUARE, RasterOptions { scale: 3.0 })
            .unwrap();
        assert_eq!((img.width, img.height), (30, 60));
        assert_eq!(&img.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn rejects_invalid_markup() {
        let err = SvgRasterizer::without_fonts()
            .rasterize("<not-svg", RasterOptions::default())
            .unwrap_err();
        assert!(matches!(err, RasterizeError::Parse(_)));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = SvgRasterizer::without_fonts()
            .rasterize(SQUARE, RasterOptions { scale: 0.0 })
            .unwrap_err();
        assert!(matches!(err, RasterizeError::InvalidScale(_)));
    }

    #[test]
    fn encodes_png() {
        let img = SvgRasterizer::without_fonts()
            .rasterize(SQUARE, RasterOptions::default())
            .unwrap();
        let png = img.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 20));
    }

    #[test]
    fn file_references_are_not_loaded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("secret.png");
        RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]))
            .save(&path)
            .unwrap();
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><image width="4" height="4" href="{}"/></svg>"#,
            path.display()
        );

        let img = SvgRasterizer::without_fonts()
            .rasterize(&svg, RasterOptions::default())
            .unwrap();
        assert!(img.rgba.chunks(4).all(|px| px[3] == 0));
    }

    #[test]
    fn renders_the_card() {
        use crate::config::CardCopy;
        use crate::logic::card::{CARD_HEIGHT, CARD_WIDTH, render_card};
        use crate::models::form::FormState;

        let card = render_card(&FormState::default(), &CardCopy::default());
        let img = SvgRasterizer::without_fonts()
            .rasterize(&card.svg, RasterOptions { scale: 3.0 })
            .unwrap();
        assert_eq!(img.width, (CARD_WIDTH * 3.0) as u32);
        assert_eq!(img.height, (CARD_HEIGHT * 3.0) as u32);
        assert!(img.rgba.chunks(4).any(|px| px[3] == 255));
    }
}
