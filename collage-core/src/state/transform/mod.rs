//! # Transforms
//!
//! Each object on the canvas carries a [`CompositeTransform`]: independent rotation, scale and translation
//! components about a fixed origin. Gestures only ever touch the components (see [`gesture`]), the
//! rasterizer's affine form is derived on demand for rendering.

pub mod gesture;

pub use gesture::{ManipulationDelta, ManipulationModes, ScalePolicy};

use crate::util::UnitF64;

/// The point about which an object scales and rotates, as a fraction of the object's size.
/// `(0, 0)` is the top left corner, `(1, 1)` the bottom right.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Origin {
    pub x: UnitF64,
    pub y: UnitF64,
}
impl Origin {
    pub const TOP_LEFT: Self = Self {
        x: UnitF64::ZERO,
        y: UnitF64::ZERO,
    };
    pub const CENTER: Self = Self {
        x: UnitF64::HALF,
        y: UnitF64::HALF,
    };
    /// The origin in object-local pixels, for an object of the given size.
    #[must_use]
    pub fn resolve(&self, size: [f64; 2]) -> [f64; 2] {
        [self.x.get() * size[0], self.y.get() * size[1]]
    }
}
impl Default for Origin {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Scale, then rotation, then translation, with scale and rotation centered on [`Self::origin`].
///
/// Components are stored separately and accumulated separately. This is *not* equivalent to
/// multiplying matrices for each gesture frame, and that is intentional.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompositeTransform {
    /// Rotation, in degrees *CW*. Unbounded, never wrapped into `[0, 360)`.
    pub rotation: f64,
    /// Horizontal and vertical scale factors.
    pub scale: [f64; 2],
    /// Translation, in logical pixels. +X Right, +Y down.
    pub translation: [f64; 2],
    /// Fixed when the object is registered.
    origin: Origin,
}

impl CompositeTransform {
    #[must_use]
    pub fn identity() -> Self {
        Self::with_origin(Origin::CENTER)
    }
    /// Identity transform that will scale and rotate about `origin`.
    #[must_use]
    pub fn with_origin(origin: Origin) -> Self {
        Self {
            rotation: 0.0,
            scale: [1.0; 2],
            translation: [0.0; 2],
            origin,
        }
    }
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }
    /// Accumulate a gesture delta with every component enabled and no scale guard.
    #[must_use = "returns a new transform and does not modify `self`"]
    pub fn apply_delta(&self, delta: &ManipulationDelta) -> Self {
        gesture::accumulate(self, delta, ManipulationModes::all(), ScalePolicy::Unbounded)
    }
    /// Object-local pixels to canvas pixels, for an object of `size` whose untransformed top-left
    /// sits at the canvas origin.
    ///
    /// The rasterizer works in `f32`. Components too large for that come out non-finite, check
    /// with [`tiny_skia::Transform::is_finite`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_transform(&self, size: [f64; 2]) -> tiny_skia::Transform {
        let [ox, oy] = self.origin.resolve(size);

        tiny_skia::Transform::from_translate(-ox as f32, -oy as f32)
            .post_scale(self.scale[0] as f32, self.scale[1] as f32)
            .post_rotate(self.rotation as f32)
            .post_translate(
                (ox + self.translation[0]) as f32,
                (oy + self.translation[1]) as f32,
            )
    }
}

impl Default for CompositeTransform {
    fn default() -> Self {
        Self::identity()
    }
}
