//! Capability traits for ray sampling and field interpolation.
//!
//! The integrator never sees a mesh. A backend provides, per worker:
//!
//! ```text
//!   Ray { start, end } ──► RaySampler::sample_ray ──► [RaySample]  (ordered start → end)
//!                                                         │
//!   field + scheme ──► Subdomain::interpolator ──► FieldInterpolator::interpolate
//!                                                         │
//!                                                         ▼
//!                                              [InterpolatedSample] ──► integrate
//! ```

use glam::DVec3;

use crate::bounds::DAabb3;
use crate::error::Result;
use crate::types::{InterpolatedSample, RaySample};

/// Produces ordered samples along a line through a domain fragment.
///
/// Implementations only return samples inside the fragment they own. Samples
/// must be ordered from `start` to `end`, and consecutive samples that are not
/// connected inside the fragment must carry different segment ids.
pub trait RaySampler: Send + Sync {
  /// Bounds of the fragment owned by this sampler.
  ///
  /// Return [`DAabb3::empty`] for a fragment that owns nothing.
  fn bounds(&self) -> DAabb3;

  /// Sample the segment `start -> end`.
  fn sample_ray(&self, start: DVec3, end: DVec3) -> Vec<RaySample>;
}

/// Interpolates a scalar phase fraction at a ray sample.
pub trait FieldInterpolator: Send + Sync {
  fn interpolate(&self, sample: &RaySample) -> f64;
}

impl<F> FieldInterpolator for F
where
  F: Fn(&RaySample) -> f64 + Send + Sync,
{
  #[inline]
  fn interpolate(&self, sample: &RaySample) -> f64 {
    self(sample)
  }
}

/// One worker's piece of the domain: a ray sampler that can also build
/// interpolators for the fields it stores.
///
/// Engine bridges may use `Box<dyn Subdomain>` for runtime flexibility.
pub trait Subdomain: RaySampler {
  /// Build an interpolator for `field` using the named scheme.
  ///
  /// # Errors
  /// [`crate::ConfigurationError::UnknownField`] or
  /// [`crate::ConfigurationError::UnknownScheme`].
  fn interpolator(&self, field: &str, scheme: &str) -> Result<Box<dyn FieldInterpolator + '_>>;
}

impl<S: RaySampler + ?Sized> RaySampler for Box<S> {
  fn bounds(&self) -> DAabb3 {
    (**self).bounds()
  }

  fn sample_ray(&self, start: DVec3, end: DVec3) -> Vec<RaySample> {
    (**self).sample_ray(start, end)
  }
}

impl<S: Subdomain + ?Sized> Subdomain for Box<S> {
  fn interpolator(&self, field: &str, scheme: &str) -> Result<Box<dyn FieldInterpolator + '_>> {
    (**self).interpolator(field, scheme)
  }
}

/// Straight sampling line through a query location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  pub start: DVec3,
  pub end: DVec3,
}

impl Ray {
  /// Ray through `location` along `direction`, reaching `extent` to either side.
  ///
  /// Starts on the `+direction` side, so with `direction` along gravity the
  /// samples run from the bottom of the domain upward.
  pub fn through(location: DVec3, direction: DVec3, extent: f64) -> Self {
    Self {
      start: location + direction * extent,
      end: location - direction * extent,
    }
  }
}

/// Ray half-length that spans the whole domain from any location inside it.
///
/// The diagonal of the union of all fragment bounds. Zero when no fragment
/// owns anything.
pub fn ray_extent<I>(bounds: I) -> f64
where
  I: IntoIterator<Item = DAabb3>,
{
  bounds
    .into_iter()
    .fold(DAabb3::empty(), |acc, b| acc.union(&b))
    .diagonal_length()
}

/// Attach interpolated phase fractions to ray samples, preserving order.
pub fn interpolate_samples(
  samples: Vec<RaySample>,
  interpolator: &dyn FieldInterpolator,
) -> Vec<InterpolatedSample> {
  samples
    .into_iter()
    .map(|sample| {
      let alpha = interpolator.interpolate(&sample);
      InterpolatedSample::new(sample, alpha)
    })
    .collect()
}

#[cfg(test)]
#[path = "sampling_test.rs"]
mod sampling_test;
