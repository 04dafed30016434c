//! # Canvas
//!
//! The unit of editing, saving, and clearing. Owns the transform of every object, their paint
//! order, and their bitmaps, and keeps the three in lockstep: an id is either in all of them or in
//! none.

use super::{
    registry::{RegistryError, TransformRegistry},
    transform::{CompositeTransform, ManipulationDelta, ManipulationModes, Origin, ScalePolicy},
    z_order::ZOrder,
    ObjectID,
};
use crate::bitmap::Bitmap;

/// What a double-tap on an object does.
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
pub enum ActivationBehavior {
    #[default]
    BringToFront,
    Delete,
}

/// The effect an activation had.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    BroughtToFront,
    Removed,
    /// The id wasn't on the canvas.
    Ignored,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasSettings {
    /// Width and height in logical pixels. Content outside is clipped.
    pub size: [u32; 2],
    /// Horizontal and vertical resolution, recorded in saved snapshots.
    pub dpi: [f32; 2],
    pub activation: ActivationBehavior,
    pub scale_policy: ScalePolicy,
    /// Gesture components honored by newly added objects.
    pub modes: ManipulationModes,
}
impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            size: [1080; 2],
            dpi: [96.0; 2],
            activation: ActivationBehavior::default(),
            scale_policy: ScalePolicy::default(),
            modes: ManipulationModes::default(),
        }
    }
}

/// Namespace for canvas ids.
pub type CanvasID = crate::CollageID<Canvas>;

/// Proof that the user was asked before clearing. Obtained from [`Canvas::request_clear`], spent by
/// [`Canvas::confirm_clear`] on the same canvas. Dropping it declines the clear.
#[must_use = "dropping a clear request declines it"]
#[derive(Debug)]
pub struct ClearRequest {
    canvas: CanvasID,
}
impl ClearRequest {
    pub const TITLE: &'static str = "Delete current collage";
    pub const MESSAGE: &'static str = "Are you sure you want to delete the current collage?";
}

struct Placed {
    bitmap: Bitmap,
    modes: ManipulationModes,
}

#[derive(Default)]
pub struct Canvas {
    id: CanvasID,
    settings: CanvasSettings,
    transforms: TransformRegistry,
    order: ZOrder,
    objects: hashbrown::HashMap<ObjectID, Placed>,
}

// Public methods for the host
impl Canvas {
    #[must_use]
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }
    #[must_use]
    pub fn id(&self) -> CanvasID {
        self.id
    }
    /// Place a photo on top of everything else, transforming about its center.
    /// # Errors
    /// See [`Self::add_object_with_origin`].
    pub fn add_object(&mut self, bitmap: Bitmap) -> Result<ObjectID, RegistryError> {
        self.add_object_with_origin(bitmap, Origin::CENTER)
    }
    /// Place a photo on top of everything else, transforming about `origin`.
    /// # Errors
    /// [`RegistryError::DuplicateId`] if the id server handed out a live id again. Nothing is
    /// placed in that case.
    pub fn add_object_with_origin(
        &mut self,
        bitmap: Bitmap,
        origin: Origin,
    ) -> Result<ObjectID, RegistryError> {
        let id = ObjectID::default();
        self.insert(id, bitmap, origin, self.settings.modes)?;
        Ok(id)
    }
    /// Place many photos. The last one ends up on top. Only ids that were actually placed are
    /// returned, failures are logged.
    pub fn add_objects(
        &mut self,
        bitmaps: impl IntoIterator<Item = Bitmap>,
    ) -> smallvec::SmallVec<[ObjectID; 1]> {
        bitmaps
            .into_iter()
            .filter_map(|bitmap| {
                self.add_object(bitmap)
                    .map_err(|e| log::error!("Failed to place photo: {e}"))
                    .ok()
            })
            .collect()
    }
    /// Restrict which gesture components `id` responds to. Returns false if `id` is unknown.
    pub fn set_modes(&mut self, id: ObjectID, modes: ManipulationModes) -> bool {
        match self.objects.get_mut(&id) {
            Some(placed) => {
                placed.modes = modes;
                true
            }
            None => false,
        }
    }
    /// Fold a gesture frame into `id`'s transform.
    /// # Errors
    /// [`RegistryError::NotFound`] if `id` isn't on this canvas. This means the host's event
    /// wiring has fallen out of sync with the canvas.
    pub fn manipulate(
        &mut self,
        id: ObjectID,
        delta: &ManipulationDelta,
    ) -> Result<CompositeTransform, RegistryError> {
        let modes = self
            .objects
            .get(&id)
            .map_or(ManipulationModes::empty(), |placed| placed.modes);
        self.transforms
            .update_with(id, delta, modes, self.settings.scale_policy)
    }
    /// React to a double-tap on `id`, according to [`CanvasSettings::activation`].
    pub fn activate(&mut self, id: ObjectID) -> Activation {
        if !self.contains(id) {
            return Activation::Ignored;
        }
        match self.settings.activation {
            ActivationBehavior::BringToFront => {
                self.order.bring_to_front(id);
                log::debug!("Brought {id} to front");
                Activation::BroughtToFront
            }
            ActivationBehavior::Delete => {
                self.remove_object(id);
                Activation::Removed
            }
        }
    }
    /// Move `id` above everything else. Unknown ids are ignored.
    pub fn bring_to_front(&mut self, id: ObjectID) -> bool {
        self.order.bring_to_front(id)
    }
    /// Take `id` off the canvas. Unknown ids are ignored.
    pub fn remove_object(&mut self, id: ObjectID) -> Option<Bitmap> {
        self.transforms.remove(id);
        self.order.remove_from_order(id);
        self.objects.remove(&id).map(|placed| placed.bitmap)
    }
    /// First half of clearing the canvas. The host should show [`ClearRequest::TITLE`] and
    /// [`ClearRequest::MESSAGE`], then either pass the request to [`Self::confirm_clear`] or drop it.
    pub fn request_clear(&self) -> ClearRequest {
        ClearRequest { canvas: self.id }
    }
    /// Remove every object at once. A request issued by another canvas is refused and `false`
    /// returned, leaving this canvas untouched.
    pub fn confirm_clear(&mut self, request: ClearRequest) -> bool {
        if request.canvas != self.id {
            log::warn!("{} refused a clear request from {}", self.id, request.canvas);
            return false;
        }
        log::debug!("Clearing {} objects", self.objects.len());
        self.transforms.clear();
        self.order.clear();
        self.objects.clear();
        true
    }
    /// # Errors
    /// [`RegistryError::NotFound`] if `id` isn't on this canvas.
    pub fn transform(&self, id: ObjectID) -> Result<CompositeTransform, RegistryError> {
        self.transforms.get(id)
    }
    #[must_use]
    pub fn bitmap(&self, id: ObjectID) -> Option<&Bitmap> {
        self.objects.get(&id).map(|placed| &placed.bitmap)
    }
    #[must_use]
    pub fn z_order(&self) -> &ZOrder {
        &self.order
    }
    #[must_use]
    pub fn contains(&self, id: ObjectID) -> bool {
        self.objects.contains_key(&id)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
    /// Every object back to front, as the renderer should paint them.
    pub fn iter_painted(
        &self,
    ) -> impl Iterator<Item = (ObjectID, &CompositeTransform, &Bitmap)> + '_ {
        self.order.iter().filter_map(|id| {
            let transform = self.transforms.lookup(id)?;
            let placed = self.objects.get(&id)?;
            Some((id, transform, &placed.bitmap))
        })
    }
}
// Private methods
impl Canvas {
    fn insert(
        &mut self,
        id: ObjectID,
        bitmap: Bitmap,
        origin: Origin,
        modes: ManipulationModes,
    ) -> Result<(), RegistryError> {
        // Registry first, so a duplicate leaves the order and bitmaps untouched.
        self.transforms.register(id, origin)?;
        self.order.add_on_top(id);
        self.objects.insert(id, Placed { bitmap, modes });
        Ok(())
    }
}
