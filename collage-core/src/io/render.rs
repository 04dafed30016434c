//! # Snapshot rendering
//!
//! Flattens a [`Canvas`] into one raster the size of the canvas, the way the host would present it:
//! every object at its transform, back to front, clipped to the canvas bounds. Rasterization is
//! done by `tiny_skia`.

use crate::{bitmap::Bitmap, state::Canvas};

/// A flattened canvas, plus the geometry needed to encode it.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Horizontal and vertical resolution.
    pub dpi: [f32; 2],
    /// Straight RGBA8, row-major, top row first.
    pub pixels: Vec<u8>,
}
impl PixelBuffer {
    /// The pixel at `(x, y)`, or `None` outside the buffer.
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
impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpi", &self.dpi)
            .finish_non_exhaustive()
    }
}

/// Upload a straight-alpha bitmap into a premultiplied pixmap. `None` if it has no pixels.
fn to_pixmap(bitmap: &Bitmap) -> Option<tiny_skia::Pixmap> {
    let size = tiny_skia::IntSize::from_wh(bitmap.width(), bitmap.height())?;
    let data = bitmap
        .pixels()
        .chunks_exact(4)
        .flat_map(|texel| {
            let color =
                tiny_skia::ColorU8::from_rgba(texel[0], texel[1], texel[2], texel[3]).premultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    tiny_skia::Pixmap::from_vec(data, size)
}

/// Whether `transform` maps a bitmap onto a region with area.
/// Zero scale collapses it, overflowing components can't be rasterized.
fn is_drawable(transform: &tiny_skia::Transform) -> bool {
    transform.is_finite()
        && transform
            .invert()
            .is_some_and(|inverse| inverse.is_finite())
}

/// Compose every object on `canvas` into a single raster of the canvas' size.
///
/// Objects are painted in z-order with bilinear filtering and source-over blending. Anything
/// outside the canvas is clipped. Objects whose transform collapses them to nothing (zero scale)
/// are skipped.
#[must_use]
pub fn render_canvas(canvas: &Canvas) -> PixelBuffer {
    let settings = canvas.settings();
    let [width, height] = settings.size;
    let Some(mut target) = tiny_skia::Pixmap::new(width, height) else {
        log::warn!("Cannot rasterize a {width}x{height} canvas");
        return PixelBuffer {
            width,
            height,
            dpi: settings.dpi,
            pixels: Vec::new(),
        };
    };
    let paint = tiny_skia::PixmapPaint {
        quality: tiny_skia::FilterQuality::Bilinear,
        ..Default::default()
    };

    for (id, transform, bitmap) in canvas.iter_painted() {
        let transform = transform.to_transform(bitmap.size());
        if !is_drawable(&transform) {
            log::debug!("Skipping degenerate {id}");
            continue;
        }
        let Some(source) = to_pixmap(bitmap) else {
            log::debug!("Skipping empty {id}");
            continue;
        };
        target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }

    PixelBuffer {
        width,
        height,
        dpi: settings.dpi,
        pixels: target
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::{
        transform::ManipulationDelta, ActivationBehavior, Canvas, CanvasSettings,
    };

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0; 4];

    fn canvas(size: u32) -> Canvas {
        Canvas::new(CanvasSettings {
            size: [size; 2],
            dpi: [144.0, 72.0],
            activation: ActivationBehavior::BringToFront,
            ..Default::default()
        })
    }

    #[test]
    fn empty_canvas_is_transparent() {
        let buffer = render_canvas(&canvas(3));
        assert_eq!(buffer.width, 3);
        assert_eq!(buffer.height, 3);
        assert_eq!(buffer.dpi, [144.0, 72.0]);
        assert!(buffer.pixels.iter().all(|&b| b == 0));
        assert_eq!(buffer.pixels.len(), 3 * 3 * 4);
    }
    #[test]
    fn untransformed_object_at_top_left() {
        let mut canvas = canvas(4);
        canvas.add_object(Bitmap::solid(2, 2, RED)).unwrap();
        let buffer = render_canvas(&canvas);

        for y in 0..4 {
            for x in 0..4 {
                let expected = if x < 2 && y < 2 { RED } else { CLEAR };
                assert_eq!(buffer.get(x, y), Some(expected), "at {x},{y}");
            }
        }
    }
    #[test]
    fn z_order_decides_overlap() {
        let mut canvas = canvas(2);
        let red = canvas.add_object(Bitmap::solid(2, 2, RED)).unwrap();
        canvas.add_object(Bitmap::solid(2, 2, BLUE)).unwrap();
        assert_eq!(render_canvas(&canvas).get(1, 1), Some(BLUE));

        canvas.activate(red);
        assert_eq!(render_canvas(&canvas).get(1, 1), Some(RED));
    }
    #[test]
    fn translated_off_edge_is_clipped() {
        let mut canvas = canvas(4);
        let id = canvas.add_object(Bitmap::solid(2, 2, RED)).unwrap();
        canvas
            .manipulate(id, &ManipulationDelta::new(0.0, 1.0, 3.0, 3.0))
            .unwrap();
        let buffer = render_canvas(&canvas);
        assert_eq!(buffer.get(3, 3), Some(RED));
        assert_eq!(buffer.get(2, 2), Some(CLEAR));
        assert_eq!(buffer.get(0, 0), Some(CLEAR));

        // Entirely outside.
        canvas
            .manipulate(id, &ManipulationDelta::new(0.0, 1.0, -1000.0, 5000.0))
            .unwrap();
        assert!(render_canvas(&canvas).pixels.iter().all(|&b| b == 0));
    }
    #[test]
    fn scaled_about_center() {
        let mut canvas = canvas(6);
        let id = canvas.add_object(Bitmap::solid(2, 2, RED)).unwrap();
        // Centered at (1, 1), 3x makes it span (-2, -2) to (4, 4)
        canvas
            .manipulate(id, &ManipulationDelta::new(0.0, 3.0, 0.0, 0.0))
            .unwrap();
        let buffer = render_canvas(&canvas);
        assert_eq!(buffer.get(0, 0), Some(RED));
        assert_eq!(buffer.get(3, 3), Some(RED));
        assert_eq!(buffer.get(4, 4), Some(CLEAR));
    }
    #[test]
    fn zero_scale_is_skipped() {
        let mut canvas = canvas(2);
        let id = canvas.add_object(Bitmap::solid(2, 2, RED)).unwrap();
        canvas
            .manipulate(id, &ManipulationDelta::new(0.0, 0.0, 0.0, 0.0))
            .unwrap();
        assert!(render_canvas(&canvas).pixels.iter().all(|&b| b == 0));
    }
    #[test]
    fn translucent_over_opaque() {
        let mut canvas = canvas(1);
        canvas.add_object(Bitmap::solid(1, 1, BLUE)).unwrap();
        canvas.add_object(Bitmap::solid(1, 1, [255, 0, 0, 51])).unwrap();
        let [r, g, b, a] = render_canvas(&canvas).get(0, 0).unwrap();
        // 20% red over blue.
        assert_eq!(a, 255);
        assert_eq!(g, 0);
        assert!(r.abs_diff(51) <= 1, "{r}");
        assert!(b.abs_diff(204) <= 1, "{b}");
    }
    #[test]
    fn rotated_quarter_turn() {
        let mut canvas = canvas(4);
        // 4x2, centered on (2, 1). A quarter turn makes it stand upright over x 1..3, y -1..3.
        let id = canvas.add_object(Bitmap::solid(4, 2, RED)).unwrap();
        canvas
            .manipulate(id, &ManipulationDelta::new(90.0, 1.0, 0.0, 0.0))
            .unwrap();
        let buffer = render_canvas(&canvas);
        assert_eq!(buffer.get(0, 1), Some(CLEAR));
        assert_eq!(buffer.get(1, 1), Some(RED));
        assert_eq!(buffer.get(2, 2), Some(RED));
        assert_eq!(buffer.get(3, 0), Some(CLEAR));
    }
    #[test]
    fn unrepresentable_transforms_are_skipped() {
        let mut canvas = canvas(2);
        let nan = canvas.add_object(Bitmap::solid(2, 2, RED)).unwrap();
        let huge = canvas.add_object(Bitmap::solid(2, 2, BLUE)).unwrap();
        canvas
            .manipulate(nan, &ManipulationDelta::new(f64::NAN, 1.0, 0.0, 0.0))
            .unwrap();
        canvas
            .manipulate(huge, &ManipulationDelta::new(0.0, 1e308, 1e308, 0.0))
            .unwrap();
        assert!(render_canvas(&canvas).pixels.iter().all(|&b| b == 0));
    }
}
