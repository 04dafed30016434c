//! # Gesture accumulation
//!
//! The host's input layer recognizes pinches, twists and drags and reports them as a stream of
//! [`ManipulationDelta`]s, each relative to the previous frame. Those are folded into the object's
//! [`CompositeTransform`] one component at a time: rotation and translation add up, scale multiplies.

use super::CompositeTransform;

/// Change of one gesture frame, relative to the previous frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ManipulationDelta {
    /// Degrees, CW.
    pub rotation: f64,
    /// Uniform scale factor. `1.0` is no change.
    pub scale: f64,
    /// Logical pixels.
    pub translation: [f64; 2],
}
impl ManipulationDelta {
    /// A delta that changes nothing.
    pub const NONE: Self = Self {
        rotation: 0.0,
        scale: 1.0,
        translation: [0.0; 2],
    };
    #[must_use]
    pub fn new(rotation: f64, scale: f64, dx: f64, dy: f64) -> Self {
        Self {
            rotation,
            scale,
            translation: [dx, dy],
        }
    }
}
impl Default for ManipulationDelta {
    fn default() -> Self {
        Self::NONE
    }
}

bitflags::bitflags! {
    /// Which components of incoming deltas an object responds to.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ManipulationModes: u32 {
        const TRANSLATE_X = 1;
        const TRANSLATE_Y = 1 << 1;
        const ROTATE = 1 << 2;
        const SCALE = 1 << 3;
        /// Inertia arrives from the host as ordinary deltas. Accepted, but changes nothing here.
        const TRANSLATE_INERTIA = 1 << 4;

        const TRANSLATE = Self::TRANSLATE_X.bits() | Self::TRANSLATE_Y.bits();
    }
}
impl Default for ManipulationModes {
    fn default() -> Self {
        Self::all()
    }
}

/// What to do with scale factors that would flip or collapse an object.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ScalePolicy {
    /// Multiply every factor in as-is. A factor of zero collapses the object for good.
    #[default]
    Unbounded,
    /// Ignore the scale part of a delta when its factor is non-finite, zero, or negative.
    RejectNonPositive,
}

/// Fold `delta` into `current`, honoring only the components enabled in `modes`.
/// The origin is never changed.
#[must_use]
pub fn accumulate(
    current: &CompositeTransform,
    delta: &ManipulationDelta,
    modes: ManipulationModes,
    policy: ScalePolicy,
) -> CompositeTransform {
    let mut next = *current;

    if modes.contains(ManipulationModes::ROTATE) {
        next.rotation += delta.rotation;
    }
    if modes.contains(ManipulationModes::SCALE) {
        let accepted = match policy {
            ScalePolicy::Unbounded => true,
            ScalePolicy::RejectNonPositive => delta.scale.is_finite() && delta.scale > 0.0,
        };
        if accepted {
            next.scale[0] *= delta.scale;
            next.scale[1] *= delta.scale;
        } else {
            log::warn!("Rejected gesture scale factor {}", delta.scale);
        }
    }
    if modes.contains(ManipulationModes::TRANSLATE_X) {
        next.translation[0] += delta.translation[0];
    }
    if modes.contains(ManipulationModes::TRANSLATE_Y) {
        next.translation[1] += delta.translation[1];
    }

    next
}
