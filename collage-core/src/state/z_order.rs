//! # Z-order
//!
//! Back-to-front paint order of the objects on a canvas. The last id paints over all others.

use super::ObjectID;

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ZOrder {
    // O(n) on every move. Canvases hold a handful of photos, not thousands.
    order: Vec<ObjectID>,
}
impl ZOrder {
    /// Place `id` above everything else.
    ///
    /// It is a logic error to add an id that is already ordered.
    pub fn add_on_top(&mut self, id: ObjectID) {
        debug_assert!(!self.order.contains(&id), "{id} ordered twice");
        self.order.push(id);
    }
    /// Move `id` above everything else, keeping the relative order of the rest.
    /// Returns false, changing nothing, if `id` is not ordered.
    pub fn bring_to_front(&mut self, id: ObjectID) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        // Rotating the tail moves `id` to the end and shifts its followers down one.
        self.order[idx..].rotate_left(1);
        true
    }
    /// Unknown ids are ignored.
    pub fn remove_from_order(&mut self, id: ObjectID) {
        if let Some(idx) = self.position(id) {
            self.order.remove(idx);
        }
    }
    pub fn clear(&mut self) {
        self.order.clear();
    }
    /// Index from the back, where 0 paints first.
    #[must_use]
    pub fn position(&self, id: ObjectID) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }
    /// The front-most object.
    #[must_use]
    pub fn top(&self) -> Option<ObjectID> {
        self.order.last().copied()
    }
    /// Back to front.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = ObjectID> + ExactSizeIterator + '_ {
        self.order.iter().copied()
    }
    #[must_use]
    pub fn as_slice(&self) -> &[ObjectID] {
        &self.order
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
