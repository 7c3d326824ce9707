//! Decoding photo payloads and bridging them into Cairo surfaces.

use super::error::ExportError;
use image::DynamicImage;

/// Decodes an encoded image payload (base image or attached photo).
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, image::ImageError> {
    image::load_from_memory(bytes)
}

/// Converts a decoded image into an ARGB32 Cairo surface.
///
/// Alpha is premultiplied as Cairo expects, so transparent source pixels let
/// the composition's white underlay show through instead of going black.
pub fn to_surface(image: &DynamicImage) -> Result<cairo::ImageSurface, ExportError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut surface =
        cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface
            .data()
            .map_err(|err| ExportError::Surface(err.to_string()))?;
        for (y, row) in rgba.rows().enumerate() {
            let line = &mut data[y * stride..];
            for (x, pixel) in row.enumerate() {
                let [r, g, b, a] = pixel.0;
                let a = a as u32;
                let premultiply = |c: u8| (c as u32 * a + 127) / 255;
                let value =
                    (a << 24) | (premultiply(r) << 16) | (premultiply(g) << 8) | premultiply(b);
                line[x * 4..x * 4 + 4].copy_from_slice(&value.to_ne_bytes());
            }
        }
    }
    surface.mark_dirty();
    Ok(surface)
}

/// Reads an RGB24 surface back into an owned RGB image buffer.
pub fn surface_to_rgb(surface: &mut cairo::ImageSurface) -> Result<image::RgbImage, ExportError> {
    if surface.format() != cairo::Format::Rgb24 {
        return Err(ExportError::Surface(format!(
            "expected RGB24 surface, got {:?}",
            surface.format()
        )));
    }

    let width = surface.width() as u32;
    let height = surface.height() as u32;
    let stride = surface.stride() as usize;
    let data = surface
        .data()
        .map_err(|err| ExportError::Surface(err.to_string()))?;

    let mut out = image::RgbImage::new(width, height);
    for y in 0..height {
        let line = &data[y as usize * stride..];
        for x in 0..width {
            let value = u32::from_ne_bytes(line[x as usize * 4..x as usize * 4 + 4].try_into().unwrap());
            let r = ((value >> 16) & 0xff) as u8;
            let g = ((value >> 8) & 0xff) as u8;
            let b = (value & 0xff) as u8;
            out.put_pixel(x, y, image::Rgb([r, g, b]));
        }
    }
    Ok(out)
}
