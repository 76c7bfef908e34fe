//! Axis-aligned bounding box with double precision for domain fragments.

use glam::DVec3;

/// Box owned by one worker, in double precision.
///
/// The union over all workers gives the global domain extent used to size the
/// sampling rays. Both corners are part of the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
	pub min: DVec3,
	pub max: DVec3,
}

impl DAabb3 {
	/// Box spanning `min..=max`; `min` must not exceed `max` on any axis.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		debug_assert!(min.cmple(max).all(), "Box corners out of order: {min} > {max}");
		Self { min, max }
	}

	/// Inverted box owning nothing, the identity of [`DAabb3::union`].
	pub fn empty() -> Self {
		Self {
			min: DVec3::INFINITY,
			max: DVec3::NEG_INFINITY,
		}
	}

	/// Returns false for boxes that own nothing.
	#[inline]
	pub fn is_valid(&self) -> bool {
		self.min.cmple(self.max).all()
	}

	/// Smallest box holding both. Invalid boxes contribute nothing.
	#[inline]
	pub fn union(&self, other: &DAabb3) -> DAabb3 {
		DAabb3 {
			min: self.min.min(other.min),
			max: self.max.max(other.max),
		}
	}

	/// Inclusive point test.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.cmpge(self.min).all() && point.cmple(self.max).all()
	}

	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	/// Length of the diagonal, zero for an invalid box.
	#[inline]
	pub fn diagonal_length(&self) -> f64 {
		if self.is_valid() {
			self.size().length()
		} else {
			0.0
		}
	}

	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	/// Clip the segment `start -> end` against the box (slab method).
	///
	/// Returns the entry and exit parameters in [0, 1], with
	/// `point = start + (end - start) * t`.
	pub fn clip_segment(&self, start: DVec3, end: DVec3) -> Option<(f64, f64)> {
		if !self.is_valid() {
			return None;
		}

		let delta = end - start;
		let mut t_enter = 0.0_f64;
		let mut t_exit = 1.0_f64;

		for axis in 0..3 {
			let d = delta[axis];
			if d == 0.0 {
				// Parallel to this slab: either always inside or never
				if start[axis] < self.min[axis] || start[axis] > self.max[axis] {
					return None;
				}
				continue;
			}

			let inv = 1.0 / d;
			let mut t_near = (self.min[axis] - start[axis]) * inv;
			let mut t_far = (self.max[axis] - start[axis]) * inv;
			if t_near > t_far {
				std::mem::swap(&mut t_near, &mut t_far);
			}

			t_enter = t_enter.max(t_near);
			t_exit = t_exit.min(t_far);
			if t_enter > t_exit {
				return None;
			}
		}

		Some((t_enter, t_exit))
	}
}
