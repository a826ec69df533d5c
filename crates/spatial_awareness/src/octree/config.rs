//! OctreeConfig - subdivision limits for the spatial index.

/// Subdivision limits applied to every node of an [`Octree`](super::Octree).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
  /// Entries a leaf holds before it subdivides.
  pub capacity: usize,
  /// Depth at which leaves stop subdividing and accept entries unboundedly.
  /// The root is depth 0.
  pub max_depth: u32,
}

impl OctreeConfig {
  /// Limits used when a tree is first created.
  pub const INITIAL: Self = Self {
    capacity: 10,
    max_depth: 3,
  };

  /// Limits used when a tree is reset. Deeper than [`OctreeConfig::INITIAL`].
  pub const RESET: Self = Self {
    capacity: 10,
    max_depth: 10,
  };

  /// Check whether a leaf at `depth` holding `len` entries accepts another
  /// entry without subdividing.
  #[inline]
  pub fn accepts(&self, len: usize, depth: u32) -> bool {
    len < self.capacity || depth >= self.max_depth
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self::INITIAL
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
