//! # State
//!
//! Everything that makes up a collage: per-object transforms, paint order, and the canvas that ties
//! them to their bitmaps.

pub mod canvas;
pub mod registry;
pub mod transform;
pub mod z_order;

pub use canvas::{
    Activation, ActivationBehavior, Canvas, CanvasID, CanvasSettings, ClearRequest,
};
pub use registry::{RegistryError, TransformRegistry};
pub use z_order::ZOrder;

/// Namespace for the ids of objects placed on a canvas.
pub enum CanvasObject {}
pub type ObjectID = crate::CollageID<CanvasObject>;
