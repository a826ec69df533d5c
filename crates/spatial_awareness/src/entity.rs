//! Entity identity and transform snapshots shared by both components.
//!
//! The subsystem never owns entities. It identifies them by [`EntityId`] and
//! reads their placement through [`Transform`] copies.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::octree::SpatialHandle;

// =============================================================================
// EntityId - unique identifier
// =============================================================================

/// Atomic counter for generating unique EntityIds.
static ENTITY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque entity identifier.
///
/// Generated atomically - guaranteed unique within process lifetime.
/// Raw value 0 is reserved for [`EntityId::NULL`] and never issued.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// The null identifier. Rejected by the spatial index.
    pub const NULL: Self = Self(0);

    /// Generate a new unique EntityId.
    pub fn new() -> Self {
        Self(ENTITY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialHandle for EntityId {
    fn is_valid(&self) -> bool {
        !self.is_null()
    }
}

// =============================================================================
// Transform - placement snapshot
// =============================================================================

/// World placement of an entity: position and unit forward direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Transform {
    /// Origin, facing +X.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        forward: Vec3::X,
    };

    /// Create a transform. `forward` is normalized; a zero vector stays zero.
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
        }
    }

    /// Transform at `position` facing +X.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// EntityKind - spatial capability
// =============================================================================

/// What kind of object an entity is, as far as placement goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A standalone placed object.
    Actor,
    /// A component attached to (and transformed with) another object.
    Attachment,
    /// An object without a world placement.
    Abstract,
}

impl EntityKind {
    /// Whether entities of this kind have a transform worth scoring.
    #[inline]
    pub fn is_spatial(&self) -> bool {
        matches!(self, Self::Actor | Self::Attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_is_unique() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        let id3 = EntityId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn entity_id_never_null() {
        for _ in 0..100 {
            let id = EntityId::new();
            assert!(!id.is_null());
            assert!(id.is_valid());
        }
        assert!(!EntityId::NULL.is_valid());
    }

    #[test]
    fn transform_normalizes_forward() {
        let transform = Transform::new(Vec3::ONE, Vec3::new(0.0, 3.0, 4.0));
        assert!((transform.forward.length() - 1.0).abs() < 1e-6);
        assert_eq!(Transform::new(Vec3::ZERO, Vec3::ZERO).forward, Vec3::ZERO);
    }

    #[test]
    fn spatial_kinds() {
        assert!(EntityKind::Actor.is_spatial());
        assert!(EntityKind::Attachment.is_spatial());
        assert!(!EntityKind::Abstract.is_spatial());
    }
}
