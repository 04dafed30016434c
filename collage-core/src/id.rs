//! # IDs
//! Every object placed on a canvas needs an identity that outlives any particular index into
//! the canvas' collections. This is implemented via [`CollageID<T>`], which is unique within
//! one run of the program and namespaced by the type `T`, so an id for one kind of thing can never
//! be mistaken for an id of another.
//!
//! Fresh ids come from the `Default` impl. Many at once may be taken with [`CollageID::many`].
//! IDs are never handed out twice, so an id removed from a canvas is never reused for a later object.

use std::{
    any::TypeId,
    collections::BTreeMap,
    marker::PhantomData,
    num::NonZeroU64,
    sync::atomic::{AtomicU64, Ordering},
};

/// Next free id, per namespace. Namespaces are created lazily on first allocation.
static NEXT_IDS: parking_lot::RwLock<BTreeMap<TypeId, AtomicU64>> =
    parking_lot::const_rwlock(BTreeMap::new());

/// Reserve `count` consecutive ids in the namespace `T`, returning the first.
fn reserve<T: 'static>(count: u64) -> u64 {
    let namespace = TypeId::of::<T>();
    let read = NEXT_IDS.upgradable_read();
    let first = if let Some(next) = read.get(&namespace) {
        next.fetch_add(count, Ordering::Relaxed)
    } else {
        // Zero is the niche, start counting at one.
        let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
        write.insert(namespace, AtomicU64::new(count.wrapping_add(1)));
        1
    };

    // Wrapped around into zero or into ids handed out before.
    #[allow(clippy::manual_assert)]
    if first.wrapping_add(count) <= count {
        #[cfg(not(test))]
        {
            log::error!("{} ID space exhausted!", std::any::type_name::<T>());
            log::logger().flush();
            // Uniqueness is the whole point of this module, nothing downstream can recover.
            std::process::abort();
        }
        #[cfg(test)]
        {
            panic!("{} ID space exhausted!", std::any::type_name::<T>())
        }
    }

    first
}

/// ID that is unique within this execution of the program.
/// IDs of different namespaces may share a numeric value but can never be compared.
pub struct CollageID<T: 'static> {
    id: NonZeroU64,
    _namespace: PhantomData<fn() -> T>,
}

impl<T: 'static> CollageID<T> {
    /// The raw number backing this ID.
    /// IDs from differing namespaces may share the same number!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    /// Allocate `count` IDs in one go, much cheaper than allocating them individually.
    ///
    /// IDs are reserved eagerly. Dropping the iterator early does *not* return the unused ones.
    /// The order of the yielded IDs is unspecified, only their uniqueness is.
    pub fn many(count: usize) -> impl ExactSizeIterator<Item = Self> {
        // usize always fits in u64 on supported targets.
        let first = reserve::<T>(count as u64);

        (0..count).map(move |offset| Self {
            // Cannot be zero, `reserve` checks for wrap-around.
            id: NonZeroU64::new(first + offset as u64).unwrap_or(NonZeroU64::MIN),
            _namespace: PhantomData,
        })
    }
}

impl<T: 'static> Default for CollageID<T> {
    fn default() -> Self {
        let first = reserve::<T>(1);
        Self {
            // `reserve` never yields zero without aborting first.
            id: NonZeroU64::new(first).unwrap_or(NonZeroU64::MIN),
            _namespace: PhantomData,
        }
    }
}

impl<T: 'static> Clone for CollageID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: 'static> Copy for CollageID<T> {}
impl<T: 'static> PartialEq for CollageID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: 'static> Eq for CollageID<T> {}
impl<T: 'static> PartialOrd for CollageID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: 'static> Ord for CollageID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T: 'static> std::hash::Hash for CollageID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: 'static> std::fmt::Display for CollageID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one item.
        let short_name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{short_name}#{}", self.id)
    }
}
impl<T: 'static> std::fmt::Debug for CollageID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
