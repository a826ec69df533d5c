//! OctreeNode - a region of the spatial index, either a leaf holding entries
//! or an internal node owning exactly eight children.

use std::collections::HashMap;
use std::hash::Hash;

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use super::{Aabb, OctreeConfig, OctreeStats, SpatialHandle};

/// An entity stored in a leaf together with the position it was indexed at.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<T> {
  pub entity: T,
  pub position: Vec3,
}

/// Entries of one category inside a leaf, in insertion order.
pub type Bucket<T> = SmallVec<[Entry<T>; 4]>;

/// Leaf storage or eight owned children. Never both.
pub(crate) enum NodeState<T, K> {
  Leaf {
    buckets: HashMap<K, Bucket<T>>,
    /// Entries across all buckets.
    len: usize,
  },
  Internal(Box<[OctreeNode<T, K>; 8]>),
}

impl<T, K> NodeState<T, K> {
  fn empty_leaf() -> Self {
    Self::Leaf {
      buckets: HashMap::new(),
      len: 0,
    }
  }
}

/// A node of the octree.
///
/// Every entry stored in this node or its descendants lies inside `bounds`.
pub struct OctreeNode<T, K> {
  bounds: Aabb,
  depth: u32,
  config: OctreeConfig,
  state: NodeState<T, K>,
}

impl<T: SpatialHandle, K: Eq + Hash + Clone> OctreeNode<T, K> {
  /// Create an empty leaf.
  pub fn new(bounds: Aabb, depth: u32, config: OctreeConfig) -> Self {
    Self {
      bounds,
      depth,
      config,
      state: NodeState::empty_leaf(),
    }
  }

  pub fn bounds(&self) -> &Aabb {
    &self.bounds
  }

  pub fn depth(&self) -> u32 {
    self.depth
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self.state, NodeState::Leaf { .. })
  }

  /// Children in octant order, or `None` for a leaf.
  pub fn children(&self) -> Option<&[OctreeNode<T, K>; 8]> {
    match &self.state {
      NodeState::Leaf { .. } => None,
      NodeState::Internal(children) => Some(&**children),
    }
  }

  /// Bucket for `category` if this is a leaf holding entries of it.
  pub fn bucket(&self, category: &K) -> Option<&Bucket<T>> {
    match &self.state {
      NodeState::Leaf { buckets, .. } => buckets.get(category),
      NodeState::Internal(_) => None,
    }
  }

  /// Number of entries in this subtree.
  pub fn len(&self) -> usize {
    match &self.state {
      NodeState::Leaf { len, .. } => *len,
      NodeState::Internal(children) => children.iter().map(OctreeNode::len).sum(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Insert an entry, subdividing full leaves on the way down.
  ///
  /// Returns `false` if `position` is outside this node.
  pub fn insert(&mut self, entity: T, position: Vec3, category: K) -> bool {
    if !self.bounds.contains_point(position) {
      return false;
    }

    if let NodeState::Leaf { buckets, len } = &mut self.state {
      if self.config.accepts(*len, self.depth) {
        buckets
          .entry(category)
          .or_default()
          .push(Entry { entity, position });
        *len += 1;

        if *len > self.config.capacity {
          tracing::warn!(
            depth = self.depth,
            len = *len,
            capacity = self.config.capacity,
            "octree leaf at max depth exceeds capacity"
          );
        }
        return true;
      }
      self.subdivide();
    }

    let octant = self.bounds.octant_of(position);
    let NodeState::Internal(children) = &mut self.state else {
      return false;
    };
    children[octant].insert(entity, position, category)
  }

  /// Split this leaf into eight octants and move every entry down.
  ///
  /// Each entry keeps its own category.
  fn subdivide(&mut self) {
    let mut children: Box<[OctreeNode<T, K>; 8]> = Box::new(std::array::from_fn(|octant| {
      OctreeNode::new(self.bounds.octant(octant), self.depth + 1, self.config)
    }));

    if let NodeState::Leaf { buckets, .. } = std::mem::replace(&mut self.state, NodeState::empty_leaf()) {
      for (category, entries) in buckets {
        for entry in entries {
          let octant = self.bounds.octant_of(entry.position);
          children[octant].insert(entry.entity, entry.position, category.clone());
        }
      }
    }

    tracing::trace!(depth = self.depth, "octree node subdivided");
    self.state = NodeState::Internal(children);
  }

  /// Remove the first entry matching `entity` from the leaf owning
  /// `position`. Empty buckets are pruned.
  pub fn remove(&mut self, entity: &T, position: Vec3, category: &K) -> bool {
    if !self.bounds.contains_point(position) {
      return false;
    }

    match &mut self.state {
      NodeState::Leaf { buckets, len } => {
        let Some(bucket) = buckets.get_mut(category) else {
          return false;
        };
        let Some(index) = bucket.iter().position(|entry| entry.entity == *entity) else {
          return false;
        };
        bucket.remove(index);
        *len -= 1;
        if bucket.is_empty() {
          buckets.remove(category);
        }
        true
      }
      NodeState::Internal(children) => {
        children[self.bounds.octant_of(position)].remove(entity, position, category)
      }
    }
  }

  /// Move the stored position of `entity` from `old` to `new` in place.
  ///
  /// `routed_together` tracks whether `old` and `new` have followed the same
  /// path from the root so far. Returns `None` if the entity is not stored at
  /// `old`, `Some(true)` if the position was updated, and `Some(false)` if
  /// `new` belongs to a different leaf (nothing is changed).
  pub fn refresh_position(
    &mut self,
    entity: &T,
    old: Vec3,
    new: Vec3,
    category: &K,
    routed_together: bool,
  ) -> Option<bool> {
    if !self.bounds.contains_point(old) {
      return None;
    }

    match &mut self.state {
      NodeState::Leaf { buckets, .. } => {
        let entry = buckets
          .get_mut(category)?
          .iter_mut()
          .find(|entry| entry.entity == *entity)?;
        if routed_together {
          entry.position = new;
        }
        Some(routed_together)
      }
      NodeState::Internal(children) => {
        let octant = self.bounds.octant_of(old);
        let together = routed_together && octant == self.bounds.octant_of(new);
        children[octant].refresh_position(entity, old, new, category, together)
      }
    }
  }

  /// Append every entry whose XY position is within `radius` of `center`.
  pub fn query(&self, center: Vec2, radius: f32, filter: Option<&K>, out: &mut Vec<T>) {
    if !self.bounds.intersects_circle_xy(center, radius) {
      return;
    }

    match &self.state {
      NodeState::Leaf { buckets, .. } => {
        let radius_sq = radius * radius;
        let mut collect = |bucket: &Bucket<T>| {
          out.extend(
            bucket
              .iter()
              .filter(|entry| entry.position.truncate().distance_squared(center) <= radius_sq)
              .map(|entry| entry.entity.clone()),
          );
        };
        match filter {
          Some(category) => {
            if let Some(bucket) = buckets.get(category) {
              collect(bucket);
            }
          }
          None => buckets.values().for_each(collect),
        }
      }
      NodeState::Internal(children) => {
        for child in children.iter() {
          child.query(center, radius, filter, out);
        }
      }
    }
  }

  /// Accumulate structural statistics for this subtree.
  pub fn collect_stats(&self, stats: &mut OctreeStats) {
    stats.nodes += 1;
    stats.max_depth_reached = stats.max_depth_reached.max(self.depth);
    match &self.state {
      NodeState::Leaf { len, .. } => {
        stats.leaves += 1;
        stats.entries += *len;
        if *len > self.config.capacity {
          stats.overfull_leaves += 1;
        }
      }
      NodeState::Internal(children) => {
        for child in children.iter() {
          child.collect_stats(stats);
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
