//! # PNG export
//!
//! Encodes flattened canvases. RGBA8 only, with resolution recorded in a `pHYs` chunk.

use super::render::PixelBuffer;

const METERS_PER_INCH: f32 = 0.0254;

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Png(#[from] png::EncodingError),
    #[error("expected {expected} bytes of pixel data for the given size, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("cannot encode an image with no pixels")]
    Empty,
}

/// Encode straight RGBA8 `pixels` of the given size as a PNG file.
/// # Errors
/// Fails on a mismatch between `pixels` and the size, on an empty image, or if the codec fails.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    dpi_x: f32,
    dpi_y: f32,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::Empty);
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(EncodeError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_meter(dpi_x),
        yppu: pixels_per_meter(dpi_y),
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;

    Ok(bytes)
}

/// [`encode`] a rendered canvas.
/// # Errors
/// See [`encode`].
pub fn export_to_file(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let [dpi_x, dpi_y] = buffer.dpi;
    encode(&buffer.pixels, buffer.width, buffer.height, dpi_x, dpi_y)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels_per_meter(dpi: f32) -> u32 {
    // Saturating cast. Nonsense DPI (negative, NaN) becomes 0, which readers take as unknown.
    (dpi / METERS_PER_INCH).round() as u32
}
