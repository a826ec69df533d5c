//! Axis-aligned bounding box used as the region of every octree node.

use glam::{Vec2, Vec3};

/// Axis-aligned bounding box.
///
/// Containment is inclusive on every face, so a point on the root boundary
/// is still indexed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb {
	/// Box spanning `min..=max`. Corners must be ordered on every axis.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"aabb corners out of order: {:?} > {:?}",
			min,
			max
		);
		Self { min, max }
	}

	/// Box spanning `center ± half_extents`.
	///
	/// Negative extents are folded to their absolute value.
	pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
		let half_extents = half_extents.abs();
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Inclusive point containment.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Midpoint of the box.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Get the half-extents of the AABB.
	#[inline]
	pub fn half_extents(&self) -> Vec3 {
		(self.max - self.min) * 0.5
	}

	/// Octant index of `point` relative to the center.
	///
	/// Bits represent +X, +Y, +Z offsets:
	/// - bit 0: X >= center.x
	/// - bit 1: Y >= center.y
	/// - bit 2: Z >= center.z
	///
	/// Points on a shared face resolve to the positive side, so every point
	/// maps to exactly one octant.
	#[inline]
	pub fn octant_of(&self, point: Vec3) -> usize {
		let center = self.center();
		let mut octant = 0;
		if point.x >= center.x {
			octant |= 1;
		}
		if point.y >= center.y {
			octant |= 2;
		}
		if point.z >= center.z {
			octant |= 4;
		}
		octant
	}

	/// Bounds of the given octant (0-7, same bit layout as [`Aabb::octant_of`]).
	///
	/// Built from the parent corners and center directly so that a point routed
	/// by `octant_of` is always contained in the resulting child.
	pub fn octant(&self, octant: usize) -> Self {
		let center = self.center();
		let pick = |bit: usize, min: f32, mid: f32, max: f32| {
			if octant & bit != 0 {
				(mid, max)
			} else {
				(min, mid)
			}
		};
		let (min_x, max_x) = pick(1, self.min.x, center.x, self.max.x);
		let (min_y, max_y) = pick(2, self.min.y, center.y, self.max.y);
		let (min_z, max_z) = pick(4, self.min.z, center.z, self.max.z);
		Self {
			min: Vec3::new(min_x, min_y, min_z),
			max: Vec3::new(max_x, max_y, max_z),
		}
	}

	/// Check whether the XY projection of this box intersects a circle.
	///
	/// Clamps the circle center onto the rectangle and compares the squared
	/// distance to the closest point against the squared radius.
	#[inline]
	pub fn intersects_circle_xy(&self, center: Vec2, radius: f32) -> bool {
		let closest = center.clamp(self.min.truncate(), self.max.truncate());
		closest.distance_squared(center) <= radius * radius
	}
}
