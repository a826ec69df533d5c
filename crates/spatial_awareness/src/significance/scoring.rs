//! Background scoring pass.
//!
//! The main line captures a [`ScoringSnapshot`] (viewpoint plus one transform
//! per registered record, in record order) and hands it to a worker. The
//! worker returns a [`ScoringResult`] with one score per snapshot entry.
//! Nothing in here touches entities or the registry.

use glam::Vec3;
use web_time::Instant;

use super::config::Falloff;
use crate::entity::Transform;

/// Where significance is measured from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
	pub position: Vec3,
	/// Unit view direction (zero if the source transform had none).
	pub forward: Vec3,
}

impl Viewpoint {
	pub fn new(position: Vec3, forward: Vec3) -> Self {
		Self {
			position,
			forward: forward.normalize_or_zero(),
		}
	}
}

impl From<Transform> for Viewpoint {
	fn from(transform: Transform) -> Self {
		Self::new(transform.position, transform.forward)
	}
}

/// Owned input of one scoring pass.
#[derive(Clone, Debug)]
pub struct ScoringSnapshot {
	pub viewpoint: Viewpoint,
	/// One entry per record. `None` for entities that expired before capture.
	pub transforms: Vec<Option<Transform>>,
	pub falloff: Falloff,
}

/// Owned output of one scoring pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoringResult {
	/// Scores in snapshot order, each in [0, 1].
	pub scores: Vec<f32>,
	/// Number of scores above zero.
	pub significant: usize,
	/// Time spent scoring, in microseconds.
	pub elapsed_us: u64,
}

impl ScoringSnapshot {
	pub fn len(&self) -> usize {
		self.transforms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transforms.is_empty()
	}

	/// Score every entry (called on a worker thread).
	#[tracing::instrument(skip_all, name = "significance::score", fields(entries = self.transforms.len()))]
	pub fn score(self) -> ScoringResult {
		let start = Instant::now();
		let Viewpoint { position, forward } = self.viewpoint;

		let scores: Vec<f32> = self
			.transforms
			.iter()
			.map(|transform| match transform {
				Some(transform) => self.falloff.score(position, forward, transform.position),
				None => 0.0,
			})
			.collect();
		let significant = scores.iter().filter(|&&score| score > 0.0).count();

		ScoringResult {
			scores,
			significant,
			elapsed_us: start.elapsed().as_micros() as u64,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn snapshot(positions: &[Option<Vec3>]) -> ScoringSnapshot {
		ScoringSnapshot {
			viewpoint: Viewpoint::new(Vec3::ZERO, Vec3::X),
			transforms: positions.iter().map(|p| p.map(Transform::from_position)).collect(),
			falloff: Falloff::DEFAULT,
		}
	}

	#[test]
	fn test_scores_follow_snapshot_order() {
		let result = snapshot(&[
			Some(Vec3::new(4000.0, 0.0, 0.0)),
			Some(Vec3::new(30000.0, 0.0, 0.0)),
			Some(Vec3::new(8000.0, 0.0, 0.0)),
		])
		.score();

		assert_eq!(result.scores.len(), 3);
		assert!((result.scores[0] - 0.8).abs() < 1e-5);
		assert_eq!(result.scores[1], 0.0);
		assert!((result.scores[2] - 0.6).abs() < 1e-5);
		assert_eq!(result.significant, 2);
	}

	#[test]
	fn test_missing_transform_scores_zero() {
		let result = snapshot(&[None, Some(Vec3::new(100.0, 0.0, 0.0))]).score();
		assert_eq!(result.scores[0], 0.0);
		assert!(result.scores[1] > 0.0);
		assert_eq!(result.significant, 1);
	}

	#[test]
	fn test_empty_snapshot() {
		let snapshot = snapshot(&[]);
		assert!(snapshot.is_empty());
		let result = snapshot.score();
		assert!(result.scores.is_empty());
		assert_eq!(result.significant, 0);
	}

	#[test]
	fn test_viewpoint_forward_is_normalized() {
		let viewpoint = Viewpoint::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
		assert_eq!(viewpoint.forward, Vec3::X);

		// Unnormalized forward must not stretch the horizon.
		let mut snapshot = snapshot(&[Some(Vec3::new(-15000.0, 0.0, 0.0))]);
		snapshot.viewpoint = viewpoint;
		assert_eq!(snapshot.score().scores[0], 0.0);
	}
}
