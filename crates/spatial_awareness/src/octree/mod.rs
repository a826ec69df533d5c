//! Octree module - dynamic spatial index over world entities.
//!
//! An explicit region tree: every node owns an axis-aligned box and is either
//! a leaf holding entity handles bucketed by category, or an internal node
//! owning eight children that split its box into equal octants.
//!
//! # Octant Convention
//!
//! ```text
//! bit 0: +X    bit 1: +Y    bit 2: +Z
//! octant = (x >= cx) | (y >= cy) << 1 | (z >= cz) << 2
//! ```
//!
//! Points on a shared face go to the positive side, so every point inside a
//! node resolves to exactly one child.
//!
//! # Module Structure
//!
//! - [`bounds`]: `Aabb` - node regions and the XY circle test
//! - [`config`]: `OctreeConfig` - capacity and depth limits
//! - [`handle`]: `SpatialHandle` - what the tree can store
//! - [`node`]: `OctreeNode` - leaf/internal node and the recursive algorithms
//! - [`tree`]: `Octree` - owner-facing API (insert, remove, move, query)

pub mod bounds;
pub mod config;
pub mod handle;
pub mod node;
pub mod tree;

// Re-exports
pub use bounds::Aabb;
pub use config::OctreeConfig;
pub use handle::SpatialHandle;
pub use node::{Bucket, Entry, OctreeNode};
pub use tree::{Octree, OctreeStats};
