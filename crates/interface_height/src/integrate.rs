//! Interface height integration along one ray.
//!
//! ```text
//!          end (location - d·L)
//!           │
//!           ●  s4  seg 1      ┐
//!           ●  s3  seg 1      ┘ integrated
//!           ┊                   gap: s2 → s3 skipped (segment ids differ)
//!           ●  s2  seg 0      ┐
//!   q ──────●  s1  seg 0      │ integrated
//!           ●  s0  seg 0      ┘ boundary height = -(d · (q - s0))
//!           │
//!          start (location + d·L)
//! ```
//!
//! The trapezoidal integral of alpha along the ray, taken against `d`, is the
//! length of a column of pure liquid holding the same amount of the phase.

use glam::DVec3;

use crate::types::{InterpolatedSample, PartialIntegral, NO_BOUNDARY};

/// Integrate one worker's ordered samples for one query location.
///
/// `direction` must be the resolved unit height direction. Pairs of samples
/// with differing segment ids are never integrated. An empty sample list
/// yields [`PartialIntegral::EMPTY`].
pub fn integrate(
  location: DVec3,
  direction: DVec3,
  samples: &[InterpolatedSample],
) -> PartialIntegral {
  let boundary_height = match samples.first() {
    Some(first) => -direction.dot(location - first.position()),
    None => NO_BOUNDARY,
  };

  let mut sum_length = 0.0;
  let mut sum_length_alpha = 0.0;

  for pair in samples.windows(2) {
    let (s0, s1) = (&pair[0], &pair[1]);
    if s0.segment() != s1.segment() {
      continue;
    }

    let length = -direction.dot(s1.position() - s0.position());
    sum_length += length;
    sum_length_alpha += length * (s0.alpha + s1.alpha) / 2.0;
  }

  PartialIntegral {
    sum_length,
    sum_length_alpha,
    boundary_height,
  }
}

#[cfg(test)]
#[path = "integrate_test.rs"]
mod integrate_test;
