//! Flattened bitmap export.
//!
//! Rasterizes the full composition at a supersampling multiple of the base
//! image's native resolution, flattened onto an opaque white background, and
//! encodes it as a quality-lossy JPEG. Encoding happens entirely in memory;
//! the output file is written in one shot so a failure never leaves a partial
//! artifact.

use super::error::ExportError;
use super::photo;
use crate::draw;
use crate::model::Document;
use image::codecs::jpeg::JpegEncoder;
use std::fs;
use std::path::Path;

/// Raster export tuning.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Resolution multiplier over the base image's natural size (≥ 1).
    pub supersample: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            supersample: 2,
            jpeg_quality: 92,
        }
    }
}

/// Renders the composition into an RGB pixel buffer.
///
/// The decoded base image's dimensions are authoritative; a stale size on the
/// document (e.g. a freshly imported project) is corrected before rendering.
pub fn render_composition(
    doc: &Document,
    base_image: &[u8],
    supersample: u32,
) -> Result<image::RgbImage, ExportError> {
    let decoded = photo::decode_image(base_image).map_err(ExportError::Decode)?;
    let (width, height) = (decoded.width(), decoded.height());

    let mut doc = doc.clone();
    if doc.image_size() != (width, height) {
        if doc.image_size() != (0, 0) {
            log::warn!(
                "Document image size {:?} differs from decoded {}x{}; using decoded",
                doc.image_size(),
                width,
                height
            );
        }
        doc.set_image_size(width, height);
    }

    let base_surface = photo::to_surface(&decoded)?;
    let factor = supersample.max(1);

    let mut surface = cairo::ImageSurface::create(
        cairo::Format::Rgb24,
        (width * factor) as i32,
        (height * factor) as i32,
    )?;
    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.scale(factor as f64, factor as f64);
        draw::compose(&ctx, &doc, Some(&base_surface));
    }
    surface.flush();

    photo::surface_to_rgb(&mut surface)
}

/// Encodes an RGB buffer as JPEG at the given quality.
pub fn encode_jpeg(image: &image::RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.encode_image(image).map_err(ExportError::Encode)?;
    Ok(bytes)
}

/// Renders and writes the flattened JPEG export.
pub fn export_jpeg(
    doc: &Document,
    base_image: &[u8],
    path: &Path,
    options: RasterOptions,
) -> Result<(), ExportError> {
    let rendered = render_composition(doc, base_image, options.supersample)?;
    let bytes = encode_jpeg(&rendered, options.jpeg_quality)?;
    fs::write(path, &bytes)?;
    log::info!(
        "Exported {}x{} JPEG to {} ({} bytes)",
        rendered.width(),
        rendered.height(),
        path.display(),
        bytes.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn flat_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn empty_document_reproduces_base_image_pixels() {
        let doc = Document::with_image_size(16, 12);
        let base = flat_png(16, 12, [40, 90, 160, 255]);

        let rendered = render_composition(&doc, &base, 1).unwrap();
        assert_eq!(rendered.dimensions(), (16, 12));
        for pixel in rendered.pixels() {
            assert_eq!(pixel.0, [40, 90, 160]);
        }
    }

    #[test]
    fn transparent_base_flattens_onto_white() {
        let doc = Document::with_image_size(8, 8);
        let base = flat_png(8, 8, [0, 0, 0, 0]);

        let rendered = render_composition(&doc, &base, 1).unwrap();
        for pixel in rendered.pixels() {
            assert_eq!(pixel.0, [255, 255, 255]);
        }
    }

    #[test]
    fn supersampling_scales_output_dimensions() {
        let doc = Document::with_image_size(10, 6);
        let base = flat_png(10, 6, [255, 0, 0, 255]);

        let rendered = render_composition(&doc, &base, 2).unwrap();
        assert_eq!(rendered.dimensions(), (20, 12));
    }

    #[test]
    fn annotations_change_pixels() {
        let mut doc = Document::with_image_size(100, 100);
        doc.add_point_at(50.0, 50.0);
        let base = flat_png(100, 100, [255, 255, 255, 255]);

        let rendered = render_composition(&doc, &base, 1).unwrap();
        let touched = rendered.pixels().any(|p| p.0 != [255, 255, 255]);
        assert!(touched, "marker should have painted over the base");
    }

    #[test]
    fn decode_failure_is_surfaced_once() {
        let doc = Document::with_image_size(10, 10);
        let err = render_composition(&doc, b"not an image", 2).unwrap_err();
        assert!(matches!(err, ExportError::Decode(_)));
    }

    #[test]
    fn jpeg_encoding_produces_nonempty_output() {
        let image = image::RgbImage::from_pixel(12, 12, image::Rgb([128, 64, 32]));
        let bytes = encode_jpeg(&image, 92).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }
}
