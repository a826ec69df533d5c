//! Scheduler cadence and the distance/facing falloff curve.

use std::time::Duration;

use glam::Vec3;

/// Linear significance falloff with a facing-dependent horizon.
///
/// ```text
/// facing  = dot(view_forward, normalize(entity - view))   in [-1, 1]
/// scale   = lerp(behind_scale, ahead_scale, (facing + 1) / 2)
/// horizon = max_distance * scale
/// score   = 1 - distance / horizon   (distance <= horizon, horizon > 0)
///         = 0                        (otherwise)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Falloff {
	/// Horizon distance directly ahead of the viewpoint, before scaling.
	pub max_distance: f32,
	/// Horizon scale for entities directly behind the viewpoint.
	pub behind_scale: f32,
	/// Horizon scale for entities directly ahead of the viewpoint.
	pub ahead_scale: f32,
}

impl Falloff {
	/// Default curve: 20000 units ahead, half that behind.
	pub const DEFAULT: Self = Self {
		max_distance: 20000.0,
		behind_scale: 0.5,
		ahead_scale: 1.0,
	};

	/// Effective horizon for a facing cosine in [-1, 1].
	#[inline]
	pub fn horizon(&self, facing: f32) -> f32 {
		let t = (facing + 1.0) * 0.5;
		let scale = self.behind_scale + (self.ahead_scale - self.behind_scale) * t;
		self.max_distance * scale
	}

	/// Significance of an entity at `position` seen from `origin` looking
	/// along the unit vector `forward`.
	///
	/// A coincident entity has no direction and is scored with a facing of 0.
	#[inline]
	pub fn score(&self, origin: Vec3, forward: Vec3, position: Vec3) -> f32 {
		let offset = position - origin;
		let distance = offset.length();
		let facing = forward.dot(offset.normalize_or_zero());
		let horizon = self.horizon(facing);

		if distance <= horizon && horizon > 0.0 {
			1.0 - distance / horizon
		} else {
			0.0
		}
	}
}

impl Default for Falloff {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Configuration for a [`SignificanceManager`](super::SignificanceManager).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignificanceConfig {
	/// Time between scoring cycles.
	pub interval: Duration,
	/// Scoring curve.
	pub falloff: Falloff,
}

impl SignificanceConfig {
	pub const DEFAULT: Self = Self {
		interval: Duration::from_millis(200),
		falloff: Falloff::DEFAULT,
	};
}

impl Default for SignificanceConfig {
	fn default() -> Self {
		Self::DEFAULT
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = SignificanceConfig::default();
		assert_eq!(config.interval, Duration::from_millis(200));
		assert_eq!(config.falloff.max_distance, 20000.0);
		assert_eq!(config.falloff.behind_scale, 0.5);
		assert_eq!(config.falloff.ahead_scale, 1.0);
	}

	#[test]
	fn test_horizon_range() {
		let falloff = Falloff::DEFAULT;
		assert_eq!(falloff.horizon(1.0), 20000.0);
		assert_eq!(falloff.horizon(0.0), 15000.0);
		assert_eq!(falloff.horizon(-1.0), 10000.0);
	}

	#[test]
	fn test_score_ahead() {
		let falloff = Falloff::DEFAULT;
		let score = falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(5000.0, 0.0, 0.0));
		assert!((score - 0.75).abs() < 1e-6);
	}

	#[test]
	fn test_score_behind_has_shorter_horizon() {
		let falloff = Falloff::DEFAULT;
		let ahead = falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(5000.0, 0.0, 0.0));
		let behind = falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(-5000.0, 0.0, 0.0));
		assert!((behind - 0.5).abs() < 1e-6);
		assert!(ahead > behind);

		// Inside the forward horizon but beyond the rear one.
		assert_eq!(falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(-12000.0, 0.0, 0.0)), 0.0);
		assert!(falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(12000.0, 0.0, 0.0)) > 0.0);
	}

	#[test]
	fn test_score_beyond_horizon_is_zero() {
		let falloff = Falloff::DEFAULT;
		assert_eq!(falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(20001.0, 0.0, 0.0)), 0.0);
		assert_eq!(falloff.score(Vec3::ZERO, Vec3::X, Vec3::new(20000.0, 0.0, 0.0)), 0.0);
	}

	#[test]
	fn test_score_coincident_is_one() {
		let falloff = Falloff::DEFAULT;
		assert_eq!(falloff.score(Vec3::ONE, Vec3::X, Vec3::ONE), 1.0);
	}

	/// Holding facing fixed, moving closer strictly increases the score.
	#[test]
	fn test_score_monotonic_in_distance() {
		let falloff = Falloff::DEFAULT;
		let direction = Vec3::new(1.0, 1.0, 0.0).normalize();
		let mut previous = -1.0;
		for step in (0..=30).rev() {
			let distance = step as f32 * 1000.0;
			let score = falloff.score(Vec3::ZERO, Vec3::X, direction * distance);
			if score > 0.0 {
				assert!(score > previous, "score must grow as distance shrinks ({} at {})", score, distance);
			}
			assert!((0.0..=1.0).contains(&score));
			previous = score;
		}
	}

	#[test]
	fn test_zero_max_distance_scores_nothing() {
		let falloff = Falloff {
			max_distance: 0.0,
			..Falloff::DEFAULT
		};
		assert_eq!(falloff.score(Vec3::ZERO, Vec3::X, Vec3::ZERO), 0.0);
	}
}
