use thiserror::Error;

use crate::entity::EntityId;

/// Errors returned by the significance scheduler's boundary operations.
///
/// All of them are recoverable; callers that don't care may ignore them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignificanceError {
    #[error("viewpoint reference has expired")]
    ViewpointUnavailable,

    #[error("entity reference has expired")]
    ExpiredEntity,

    #[error("entity reports the null identifier")]
    NullEntity,

    #[error("entity {0:?} has no world placement")]
    NotSpatial(EntityId),
}
