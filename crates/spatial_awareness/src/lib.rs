//! spatial_awareness - Engine independent spatial index and significance scheduling
//!
//! Two cooperating components for simulations with many placed entities:
//!
//! - **Octree**: a dynamic region tree answering "which entities of category K
//!   are near this point?" with a horizontal-plane radius query.
//! - **Significance**: a scheduler that periodically scores registered entities
//!   by distance and facing relative to a viewpoint, off the main thread, and
//!   notifies them when they become (in)significant.
//!
//! Both are explicit instances. The host owns them, feeds frame deltas and
//! serialises access from its main loop.
//!
//! # Example
//!
//! ```ignore
//! use spatial_awareness::{entity_ref, Octree, SignificanceManager, SignificanceTag};
//!
//! let mut index: Octree<EntityId, Category> = Octree::new(Vec3::ZERO, Vec3::splat(50_000.0));
//! index.insert(villager.entity_id(), villager.transform().position, Category::Villager);
//! let nearby = index.query(Vec2::ZERO, 2_000.0, Some(&Category::Villager));
//!
//! let mut significance = SignificanceManager::new();
//! significance.initialize(entity_ref(&camera))?;
//! significance.register(entity_ref(&villager), SignificanceTag::Gameplay)?;
//!
//! loop {
//!     significance.update(frame_delta);
//! }
//! ```

// Shared entity identity and placement
pub mod entity;
pub use entity::{EntityId, EntityKind, Transform};

pub mod error;
pub use error::SignificanceError;

// Spatial index
pub mod octree;
pub use octree::{Aabb, Octree, OctreeConfig, OctreeStats, SpatialHandle};

// Significance scheduling
pub mod significance;
pub use significance::{
  entity_ref, EntityRef, Falloff, SignificanceConfig, SignificanceListener, SignificanceManager,
  SignificanceStats, SignificanceTag, Trackable,
};

// Background dispatch and frame timing
pub mod threading;
pub use threading::{Dispatch, InlineDispatch, QueuedDispatch, RayonDispatch};

pub mod timer;
pub use timer::RepeatingTimer;
