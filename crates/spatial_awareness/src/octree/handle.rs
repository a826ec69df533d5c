//! Entity handles stored in the spatial index.

/// A non-owning reference to a world entity that the octree can store.
///
/// The index compares handles for removal and clones them into query
/// results. Handles that report `is_valid() == false` are rejected by every
/// operation.
pub trait SpatialHandle: Clone + PartialEq {
  /// Whether the handle refers to a live entity.
  fn is_valid(&self) -> bool {
    true
  }
}

macro_rules! impl_integer_handle {
  ($($ty:ty),*) => {
    $(impl SpatialHandle for $ty {})*
  };
}

impl_integer_handle!(u32, u64, usize);
