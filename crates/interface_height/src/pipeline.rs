//! Reporting Step Orchestrator
//!
//! Runs resolve → sample → interpolate → integrate → reduce → assemble for
//! every configured location, using rayon for parallelism over locations and
//! over workers. This is the main entry point for solver integration.
//!
//! ```text
//!   ProbeConfig ─► validate ─► resolve_direction ─► interpolators (per worker)
//!                                                        │
//!   for each location (parallel, order kept):            ▼
//!     Ray::through ─► worker 0: sample_ray ─► interpolate ─► integrate ─┐
//!                  ─► worker 1: sample_ray ─► interpolate ─► integrate ─┼─► reduce ─► assemble
//!                  ─► worker N: ...                                     ─┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let reports = evaluate_step(&config, gravity, &workers)?;
//! for (location, report) in config.locations.iter().zip(&reports) {
//!     // Write report.position, report.height_above_boundary, ...
//! }
//! ```

use glam::DVec3;
use rayon::prelude::*;

use crate::config::ProbeConfig;
use crate::direction::resolve_direction;
use crate::error::{ConfigurationError, Result};
use crate::integrate::integrate;
use crate::reduce::reduce_parallel;
use crate::report::assemble;
use crate::sampling::{interpolate_samples, ray_extent, FieldInterpolator, Ray, RaySampler, Subdomain};
use crate::types::{InterfaceReport, PartialIntegral, ReducedIntegral};

/// Integrate one location across every worker and reduce.
///
/// `interpolators[i]` must belong to `workers[i]`. Every worker contributes,
/// including those whose fragment the ray misses.
pub fn probe_location<S: RaySampler>(
  location: DVec3,
  direction: DVec3,
  extent: f64,
  workers: &[S],
  interpolators: &[Box<dyn FieldInterpolator + '_>],
) -> ReducedIntegral {
  let (reduced, _) = probe_location_counted(location, direction, extent, workers, interpolators);
  reduced
}

/// [`probe_location`] that also returns the number of ray samples taken.
fn probe_location_counted<S: RaySampler>(
  location: DVec3,
  direction: DVec3,
  extent: f64,
  workers: &[S],
  interpolators: &[Box<dyn FieldInterpolator + '_>],
) -> (ReducedIntegral, usize) {
  debug_assert_eq!(workers.len(), interpolators.len(), "One interpolator per worker");

  let ray = Ray::through(location, direction, extent);

  let partials: Vec<(PartialIntegral, usize)> = workers
    .par_iter()
    .zip(interpolators.par_iter())
    .map(|(worker, interpolator)| {
      let samples = interpolate_samples(worker.sample_ray(ray.start, ray.end), &**interpolator);
      (integrate(location, direction, &samples), samples.len())
    })
    .collect();

  let sample_count = partials.iter().map(|(_, n)| n).sum();
  let partials: Vec<PartialIntegral> = partials.into_iter().map(|(p, _)| p).collect();
  (reduce_parallel(&partials), sample_count)
}

/// Evaluate every probe location for one reporting step.
///
/// # Arguments
///
/// * `config` - Probe configuration (field, phase, scheme, direction, locations)
/// * `ambient` - Ambient acceleration field, used when `config.direction` is zero
/// * `subdomains` - One entry per worker; together they cover the domain
///
/// # Returns
///
/// One report per configured location, in configuration order. A location
/// whose ray meets no samples yields a report with
/// [`InterfaceReport::is_found`] false.
///
/// # Errors
///
/// Invalid configuration, no workers, an unresolvable direction, or a worker
/// that cannot interpolate the requested field with the requested scheme.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::evaluate_step"))]
pub fn evaluate_step<D: Subdomain>(
  config: &ProbeConfig,
  ambient: DVec3,
  subdomains: &[D],
) -> Result<Vec<InterfaceReport>> {
  let (reports, _) = evaluate_step_counted(config, ambient, subdomains)?;
  Ok(reports)
}

fn evaluate_step_counted<D: Subdomain>(
  config: &ProbeConfig,
  ambient: DVec3,
  subdomains: &[D],
) -> Result<(Vec<InterfaceReport>, usize)> {
  config.validate()?;
  if subdomains.is_empty() {
    return Err(ConfigurationError::NoSubdomains);
  }
  let direction = resolve_direction(config.direction, ambient)?;

  // Fail before any integration if a worker lacks the field or scheme
  let interpolators = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("build_interpolators").entered();

    subdomains
      .iter()
      .map(|subdomain| subdomain.interpolator(&config.alpha, &config.interpolation_scheme))
      .collect::<Result<Vec<_>>>()?
  };

  let extent = ray_extent(subdomains.iter().map(|subdomain| subdomain.bounds()));

  #[cfg(feature = "tracing")]
  let _span = tracing::info_span!("probe_locations", count = config.locations.len()).entered();

  let probed: Vec<(InterfaceReport, usize)> = config
    .locations
    .par_iter()
    .map(|&location| {
      let (reduced, sample_count) =
        probe_location_counted(location, direction, extent, subdomains, &interpolators);
      let report = assemble(location, direction, config.liquid, &reduced);

      #[cfg(feature = "tracing")]
      {
        if !report.is_found() {
          tracing::debug!(?location, "no samples along ray, interface not found");
        }
      }

      (report, sample_count)
    })
    .collect();

  let sample_count = probed.iter().map(|(_, n)| n).sum();
  let reports = probed.into_iter().map(|(report, _)| report).collect();
  Ok((reports, sample_count))
}

/// Evaluate a reporting step with timing information.
///
/// Same as [`evaluate_step`] but also returns [`StepStats`].
pub fn evaluate_step_timed<D: Subdomain>(
  config: &ProbeConfig,
  ambient: DVec3,
  subdomains: &[D],
) -> Result<(Vec<InterfaceReport>, StepStats)> {
  use web_time::Instant;

  let start = Instant::now();
  let (reports, sample_count) = evaluate_step_counted(config, ambient, subdomains)?;
  let total_us = start.elapsed().as_micros() as u64;

  let stats = StepStats {
    location_count: reports.len(),
    sample_count,
    not_found: reports.iter().filter(|report| !report.is_found()).count(),
    total_us,
  };

  Ok((reports, stats))
}

/// Statistics from one reporting step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
  /// Number of locations evaluated.
  pub location_count: usize,
  /// Ray samples taken across all workers and locations.
  pub sample_count: usize,
  /// Locations whose ray met no samples.
  pub not_found: usize,
  /// Total evaluation time in microseconds.
  pub total_us: u64,
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
