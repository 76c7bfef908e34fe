//! Reduction of per-worker partial integrals.
//!
//! Lengths are summed and the boundary height takes the maximum. Both
//! operators are associative and commutative with identity
//! [`PartialIntegral::EMPTY`], so the result does not depend on how the domain
//! was split or on the shape of the reduction tree (up to floating-point
//! summation order). Every worker must contribute, even with no samples.

use rayon::prelude::*;

use crate::types::{PartialIntegral, ReducedIntegral};

impl PartialIntegral {
  /// Combine two contributions: sum, sum, max.
  #[inline]
  pub fn combine(self, other: PartialIntegral) -> PartialIntegral {
    PartialIntegral {
      sum_length: self.sum_length + other.sum_length,
      sum_length_alpha: self.sum_length_alpha + other.sum_length_alpha,
      boundary_height: self.boundary_height.max(other.boundary_height),
    }
  }
}

/// Reduce contributions sequentially, in iteration order.
pub fn reduce<I>(partials: I) -> ReducedIntegral
where
  I: IntoIterator<Item = PartialIntegral>,
{
  let total = partials
    .into_iter()
    .fold(PartialIntegral::EMPTY, PartialIntegral::combine);
  ReducedIntegral::from_partial(total)
}

/// Reduce contributions with rayon's work-stealing tree.
pub fn reduce_parallel(partials: &[PartialIntegral]) -> ReducedIntegral {
  let total = partials
    .par_iter()
    .copied()
    .reduce(|| PartialIntegral::EMPTY, PartialIntegral::combine);
  ReducedIntegral::from_partial(total)
}

#[cfg(test)]
#[path = "reduce_test.rs"]
mod reduce_test;
