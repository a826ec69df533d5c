//! Significance module - periodic relevance scoring for tracked entities.
//!
//! Entities register under a [`SignificanceTag`]. On a fixed cadence the
//! manager snapshots every registered transform, scores them off the main line
//! against a viewpoint, and tells each entity's [`SignificanceListener`] when
//! it crosses between significant (`> 0`) and insignificant (`0`).
//!
//! # Module Structure
//!
//! - [`config`]: `SignificanceConfig`, `Falloff` - cadence and scoring curve
//! - [`tracked`]: `Trackable`, `SignificanceListener` - what entities provide
//! - [`registry`]: `Registry` - records, lookup and debounced change queues
//! - [`scoring`]: `ScoringSnapshot` - the background pass
//! - [`notification`]: `Notification` - transition detection
//! - [`manager`]: `SignificanceManager` - ties it together on the main line

pub mod config;
pub mod manager;
pub mod notification;
pub mod registry;
pub mod scoring;
pub mod tracked;

#[cfg(test)]
pub(crate) mod probe;

// Re-exports
pub use config::{Falloff, SignificanceConfig};
pub use manager::{SignificanceManager, SignificanceStats};
pub use notification::Notification;
pub use registry::{ReconcileStats, Registry, SignificanceRecord};
pub use scoring::{ScoringResult, ScoringSnapshot, Viewpoint};
pub use tracked::{entity_ref, EntityRef, SignificanceListener, SignificanceTag, Trackable};
