//! # Bitmaps
//!
//! Decoded photos, as placed on a canvas. Always straight (non-premultiplied) RGBA8, row-major,
//! top row first.

/// Extensions accepted when picking photos to add. Compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Whether `path` names a file type that may be added to a canvas.
#[must_use]
pub fn is_supported(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("unsupported file type {0:?}, expected one of png, jpg, jpeg")]
    UnsupportedExtension(std::path::PathBuf),
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}
impl Bitmap {
    /// Wrap raw RGBA8 pixels.
    /// # Errors
    /// [`DecodeError::SizeMismatch`] if `pixels` isn't exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if pixels.len() == expected {
            Ok(Self {
                width,
                height,
                pixels,
            })
        } else {
            Err(DecodeError::SizeMismatch {
                expected,
                actual: pixels.len(),
            })
        }
    }
    /// A bitmap filled with a single color.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgba.repeat(count),
        }
    }
    /// Decode an encoded PNG or JPEG image.
    /// # Errors
    /// Forwards the codec's error for malformed or unsupported data.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let image = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = image.dimensions();

        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }
    /// Read and decode the photo at `path`.
    /// # Errors
    /// Rejects paths not matching [`SUPPORTED_EXTENSIONS`] before touching the disk, otherwise
    /// forwards IO and codec errors.
    pub fn open(path: &std::path::Path) -> Result<Self, DecodeError> {
        if !is_supported(path) {
            return Err(DecodeError::UnsupportedExtension(path.to_owned()));
        }
        let bytes = std::fs::read(path)?;
        let bitmap = Self::decode(&bytes)?;
        log::debug!(
            "Loaded {}x{} photo from {path:?}",
            bitmap.width,
            bitmap.height
        );
        Ok(bitmap)
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[must_use]
    pub fn size(&self) -> [f64; 2] {
        [f64::from(self.width), f64::from(self.height)]
    }
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
    /// The pixel at `(x, y)`, or `None` outside the bitmap.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let texel = self.pixels.get(start..start + 4)?;
        Some([texel[0], texel[1], texel[2], texel[3]])
    }
}
// Pixel data is far too noisy to print.
impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;

    #[test]
    fn extension_filter() {
        assert!(is_supported(Path::new("forest.png")));
        assert!(is_supported(Path::new("/photos/Ocean.JPG")));
        assert!(is_supported(Path::new("desert.jpeg")));
        assert!(!is_supported(Path::new("collage.bmp")));
        assert!(!is_supported(Path::new("no_extension")));
    }
    #[test]
    fn open_rejects_before_reading() {
        // Doesn't exist either, but the extension is checked first.
        let err = Bitmap::open(Path::new("/definitely/not/here.gif")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedExtension(_)));
    }
    #[test]
    fn new_checks_length() {
        assert!(Bitmap::new(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Bitmap::new(2, 2, vec![0; 15]),
            Err(DecodeError::SizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }
    #[test]
    fn solid_and_get() {
        let bitmap = Bitmap::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(bitmap.pixels().len(), 24);
        assert_eq!(bitmap.get(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(bitmap.get(3, 0), None);
        assert_eq!(bitmap.size(), [3.0, 2.0]);
    }
    #[test]
    fn decode_garbage_fails() {
        assert!(matches!(
            Bitmap::decode(b"definitely not an image"),
            Err(DecodeError::Image(_))
        ));
    }
}
