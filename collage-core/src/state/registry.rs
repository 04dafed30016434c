//! # Transform registry
//!
//! Maps each live object to its accumulated [`CompositeTransform`]. Entries are created with an
//! identity transform, changed only by gesture deltas, and dropped on removal or clear.

use super::transform::{
    gesture, CompositeTransform, ManipulationDelta, ManipulationModes, Origin, ScalePolicy,
};
use super::ObjectID;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is already registered")]
    DuplicateId(ObjectID),
    #[error("{0} is not registered")]
    NotFound(ObjectID),
}

#[derive(Clone, Default, Debug)]
pub struct TransformRegistry {
    transforms: hashbrown::HashMap<ObjectID, CompositeTransform>,
}
impl TransformRegistry {
    /// Start tracking `id` with an identity transform about `origin`.
    /// # Errors
    /// [`RegistryError::DuplicateId`] if `id` is already tracked. The existing entry is left as-is.
    pub fn register(&mut self, id: ObjectID, origin: Origin) -> Result<(), RegistryError> {
        match self.transforms.entry(id) {
            hashbrown::hash_map::Entry::Occupied(_) => Err(RegistryError::DuplicateId(id)),
            hashbrown::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(CompositeTransform::with_origin(origin));
                log::debug!("Registered {id}");
                Ok(())
            }
        }
    }
    /// # Errors
    /// [`RegistryError::NotFound`] if `id` is not tracked.
    pub fn get(&self, id: ObjectID) -> Result<CompositeTransform, RegistryError> {
        self.transforms
            .get(&id)
            .copied()
            .ok_or(RegistryError::NotFound(id))
    }
    /// Borrowing form of [`Self::get`].
    #[must_use]
    pub fn lookup(&self, id: ObjectID) -> Option<&CompositeTransform> {
        self.transforms.get(&id)
    }
    /// Accumulate a gesture frame onto `id`'s transform, returning the new value.
    /// # Errors
    /// [`RegistryError::NotFound`] if `id` is not tracked.
    pub fn update(
        &mut self,
        id: ObjectID,
        delta: &ManipulationDelta,
    ) -> Result<CompositeTransform, RegistryError> {
        self.update_with(id, delta, ManipulationModes::all(), ScalePolicy::Unbounded)
    }
    /// [`Self::update`], restricted to `modes` and guarded by `policy`.
    /// # Errors
    /// [`RegistryError::NotFound`] if `id` is not tracked.
    pub fn update_with(
        &mut self,
        id: ObjectID,
        delta: &ManipulationDelta,
        modes: ManipulationModes,
        policy: ScalePolicy,
    ) -> Result<CompositeTransform, RegistryError> {
        let transform = self
            .transforms
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;
        *transform = gesture::accumulate(transform, delta, modes, policy);
        log::trace!("{id} -> {transform:?}");

        Ok(*transform)
    }
    /// Stop tracking `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: ObjectID) {
        if self.transforms.remove(&id).is_some() {
            log::debug!("Unregistered {id}");
        }
    }
    pub fn clear(&mut self) {
        self.transforms.clear();
    }
    #[must_use]
    pub fn contains(&self, id: ObjectID) -> bool {
        self.transforms.contains_key(&id)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
    /// Iterate all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectID, &CompositeTransform)> + '_ {
        self.transforms.iter().map(|(id, t)| (*id, t))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_then_get_is_identity() {
        let mut registry = TransformRegistry::default();
        let id = ObjectID::default();
        registry.register(id, Origin::CENTER).unwrap();
        assert_eq!(registry.get(id), Ok(CompositeTransform::identity()));
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);
    }
    #[test]
    fn duplicate_register_keeps_existing() {
        let mut registry = TransformRegistry::default();
        let id = ObjectID::default();
        registry.register(id, Origin::CENTER).unwrap();
        registry
            .update(id, &ManipulationDelta::new(10.0, 1.0, 0.0, 0.0))
            .unwrap();

        assert_eq!(
            registry.register(id, Origin::TOP_LEFT),
            Err(RegistryError::DuplicateId(id))
        );
        let t = registry.get(id).unwrap();
        assert_eq!(t.rotation, 10.0);
        assert_eq!(t.origin(), Origin::CENTER);
    }
    #[test]
    fn update_unknown_fails() {
        let mut registry = TransformRegistry::default();
        let id = ObjectID::default();
        assert_eq!(
            registry.update(id, &ManipulationDelta::NONE),
            Err(RegistryError::NotFound(id))
        );
        assert!(registry.is_empty());
    }
    #[test]
    fn update_is_visible_immediately() {
        let mut registry = TransformRegistry::default();
        let id = ObjectID::default();
        registry.register(id, Origin::CENTER).unwrap();

        let returned = registry
            .update(id, &ManipulationDelta::new(15.0, 1.1, 5.0, -3.0))
            .unwrap();
        assert_eq!(registry.get(id), Ok(returned));

        let returned = registry
            .update(id, &ManipulationDelta::new(-5.0, 2.0, 0.0, 0.0))
            .unwrap();
        assert!((returned.rotation - 10.0).abs() < 1e-6);
        assert!((returned.scale[0] - 2.2).abs() < 1e-6);
        assert!((returned.scale[1] - 2.2).abs() < 1e-6);
        assert_eq!(returned.translation, [5.0, -3.0]);
    }
    #[test]
    fn remove_unknown_is_noop() {
        let mut registry = TransformRegistry::default();
        let kept = ObjectID::default();
        registry.register(kept, Origin::CENTER).unwrap();

        registry.remove(ObjectID::default());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(kept), Ok(CompositeTransform::identity()));
    }
    #[test]
    fn clear_forgets_everything() {
        let mut registry = TransformRegistry::default();
        let ids: Vec<_> = ObjectID::many(3).collect();
        for &id in &ids {
            registry.register(id, Origin::CENTER).unwrap();
        }
        registry.clear();
        assert!(registry.is_empty());
        for id in ids {
            assert_eq!(registry.get(id), Err(RegistryError::NotFound(id)));
        }
    }
}
