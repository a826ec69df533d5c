//! Octree - the owner-facing spatial index.

use std::hash::Hash;

use glam::{Vec2, Vec3};

use super::{Aabb, OctreeConfig, OctreeNode, SpatialHandle};

/// Structural statistics of an octree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
  /// Total nodes, internal and leaf.
  pub nodes: usize,
  /// Leaf nodes.
  pub leaves: usize,
  /// Stored entries.
  pub entries: usize,
  /// Deepest node depth (root = 0).
  pub max_depth_reached: u32,
  /// Leaves at max depth holding more entries than the capacity.
  pub overfull_leaves: usize,
}

/// Dynamic spatial index of entity handles bucketed by category.
///
/// `T` is the entity handle, `K` the category key. The tree never owns the
/// entities; callers pass the position an entity is indexed at and must pass
/// the same position again to remove it.
///
/// Range queries project onto the XY plane and ignore height.
pub struct Octree<T, K> {
  root: OctreeNode<T, K>,
  config: OctreeConfig,
}

impl<T: SpatialHandle, K: Eq + Hash + Clone> Octree<T, K> {
  /// Create a tree covering `center ± extents` with [`OctreeConfig::INITIAL`].
  pub fn new(center: Vec3, extents: Vec3) -> Self {
    Self::with_config(center, extents, OctreeConfig::INITIAL)
  }

  /// Create a tree covering `center ± extents` with explicit limits.
  pub fn with_config(center: Vec3, extents: Vec3, config: OctreeConfig) -> Self {
    let bounds = Aabb::from_center_half_extents(center, extents);
    tracing::debug!(?bounds, ?config, "octree initialized");
    Self {
      root: OctreeNode::new(bounds, 0, config),
      config,
    }
  }

  /// Discard every entry and rebuild the root with [`OctreeConfig::RESET`].
  pub fn reset(&mut self, center: Vec3, extents: Vec3) {
    self.reset_with_config(center, extents, OctreeConfig::RESET);
  }

  /// Discard every entry and rebuild the root with explicit limits.
  pub fn reset_with_config(&mut self, center: Vec3, extents: Vec3, config: OctreeConfig) {
    *self = Self::with_config(center, extents, config);
  }

  /// Bounds of the root node.
  pub fn bounds(&self) -> &Aabb {
    self.root.bounds()
  }

  pub fn config(&self) -> OctreeConfig {
    self.config
  }

  pub fn root(&self) -> &OctreeNode<T, K> {
    &self.root
  }

  pub fn len(&self) -> usize {
    self.root.len()
  }

  pub fn is_empty(&self) -> bool {
    self.root.is_empty()
  }

  /// Insert `entity` at `position` under `category`.
  ///
  /// Returns `false` (and stores nothing) for invalid handles or positions
  /// outside the root bounds.
  pub fn insert(&mut self, entity: T, position: Vec3, category: K) -> bool {
    if !entity.is_valid() {
      tracing::trace!("octree insert rejected: invalid handle");
      return false;
    }
    if !self.root.bounds().contains_point(position) {
      tracing::trace!(?position, "octree insert outside root bounds");
      return false;
    }
    self.root.insert(entity, position, category)
  }

  /// Remove `entity` from the leaf owning `position`.
  ///
  /// `position` must be the position the entity was indexed at.
  pub fn remove(&mut self, entity: &T, position: Vec3, category: &K) -> bool {
    if !entity.is_valid() {
      return false;
    }
    self.root.remove(entity, position, category)
  }

  /// Report whether `entity` can stay where it is after moving to `new`.
  ///
  /// Only the root bounds are checked: while `new` is inside the root this
  /// returns `true` without restructuring, refreshing the stored position
  /// when `new` still resolves to the same leaf. Otherwise the entity is
  /// removed at `old` and `false` tells the caller to reinsert it.
  pub fn update_object(&mut self, entity: &T, old: Vec3, new: Vec3, category: &K) -> bool {
    if !entity.is_valid() {
      return false;
    }
    if self.root.bounds().contains_point(new) {
      self.root.refresh_position(entity, old, new, category, true);
      return true;
    }
    self.root.remove(entity, old, category);
    false
  }

  /// Move `entity` from `old` to `new`, restructuring as needed.
  ///
  /// Unlike [`Octree::update_object`], moves between leaves are applied by
  /// removing and reinserting. Moving outside the root removes the entity.
  /// Returns whether the entity is indexed afterwards.
  pub fn relocate(&mut self, entity: &T, old: Vec3, new: Vec3, category: &K) -> bool {
    if !self.update_object(entity, old, new, category) {
      return false;
    }

    match self.root.refresh_position(entity, old, new, category, true) {
      Some(true) => true,
      Some(false) => {
        self.root.remove(entity, old, category);
        self.root.insert(entity.clone(), new, category.clone())
      }
      None => false,
    }
  }

  /// Whether `entity` is stored under `category` in the leaf owning
  /// `position`.
  pub fn contains_at(&self, entity: &T, position: Vec3, category: &K) -> bool {
    let mut node = &self.root;
    if !node.bounds().contains_point(position) {
      return false;
    }
    while let Some(children) = node.children() {
      node = &children[node.bounds().octant_of(position)];
    }
    node
      .bucket(category)
      .is_some_and(|bucket| bucket.iter().any(|entry| entry.entity == *entity))
  }

  /// Every entity within `radius` of `center` on the XY plane, optionally
  /// restricted to one category.
  ///
  /// Ordering follows insertion order inside each leaf and is otherwise
  /// unspecified.
  pub fn query(&self, center: Vec2, radius: f32, filter: Option<&K>) -> Vec<T> {
    let mut out = Vec::new();
    self.query_into(center, radius, filter, &mut out);
    out
  }

  /// Like [`Octree::query`] but appends into `out`.
  pub fn query_into(&self, center: Vec2, radius: f32, filter: Option<&K>, out: &mut Vec<T>) {
    if radius.is_nan() || radius < 0.0 {
      return;
    }
    self.root.query(center, radius, filter, out);
  }

  /// Walk the tree and gather structural statistics.
  pub fn stats(&self) -> OctreeStats {
    let mut stats = OctreeStats::default();
    self.root.collect_stats(&mut stats);
    stats
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
