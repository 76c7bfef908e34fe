//! End-to-end tests for the reporting step orchestrator.

use glam::DVec3;

use super::*;
use crate::bounds::DAabb3;
use crate::samplers::{BoxFragment, ConstantField, FreeSurfaceField, TankSubdomain, UniformGrid};

const GRAVITY: DVec3 = DVec3::new(0.0, 0.0, -9.81);
const EPS: f64 = 1e-9;

/// Unit tank, 4 x 4 x 20 cells (h_z = 0.05).
fn tank() -> BoxFragment {
  BoxFragment::new(UniformGrid::new(DAabb3::new(DVec3::ZERO, DVec3::ONE), [4, 4, 20]))
}

/// Surface at z = 0.4 smeared over 0.1. The band edges sit on sample points,
/// so the trapezoid rule integrates it exactly.
fn surface() -> FreeSurfaceField {
  FreeSurfaceField::level(DVec3::Z, 0.4).with_thickness(0.1)
}

fn workers(parts: usize) -> Vec<TankSubdomain> {
  TankSubdomain::decomposed(&tank(), 2, parts, "alpha", surface())
}

fn probe_at(location: DVec3) -> ProbeConfig {
  ProbeConfig::new().with_location(location)
}

// =============================================================================
// Batch 1: Heights and positions
// =============================================================================

#[test]
fn test_flat_surface_single_worker() {
  let location = DVec3::new(0.55, 0.45, 0.1);

  let reports = evaluate_step(&probe_at(location), GRAVITY, &workers(1)).unwrap();

  assert_eq!(reports.len(), 1);
  let report = reports[0];
  assert!(report.is_found());
  assert!((report.height_above_boundary - 0.4).abs() < EPS);
  assert!((report.boundary_height - 0.1).abs() < EPS);
  assert!((report.height_above_location - 0.3).abs() < EPS);
  assert!((report.position - DVec3::new(0.55, 0.45, 0.4)).length() < EPS);
}

#[test]
fn test_location_above_surface_gives_negative_height() {
  let location = DVec3::new(0.55, 0.45, 0.8);

  let report = evaluate_step(&probe_at(location), GRAVITY, &workers(1)).unwrap()[0];

  assert!((report.height_above_location + 0.4).abs() < EPS);
  assert!((report.position.z - 0.4).abs() < EPS);
}

#[test]
fn test_sharp_surface_within_one_sample() {
  let sharp = FreeSurfaceField::level(DVec3::Z, 0.4);
  let workers = TankSubdomain::decomposed(&tank(), 2, 1, "alpha", sharp);
  let location = DVec3::new(0.55, 0.45, 0.1);

  let report = evaluate_step(&probe_at(location), GRAVITY, &workers).unwrap()[0];

  // Half a sample spacing of smearing from the trapezoid rule
  assert!((report.position.z - 0.4).abs() <= 0.0125 + EPS);
}

#[test]
fn test_tilted_surface_keeps_location_order() {
  let tilted = surface().with_slope(DVec3::new(0.2, 0.0, 0.0));
  let workers = TankSubdomain::decomposed(&tank(), 2, 3, "alpha", tilted);
  let xs = [0.9, 0.1, 0.6, 0.35];
  let config = ProbeConfig::new().with_locations(xs.map(|x| DVec3::new(x, 0.45, 0.2)));

  let reports = evaluate_step(&config, GRAVITY, &workers).unwrap();

  assert_eq!(reports.len(), xs.len());
  for (x, report) in xs.iter().zip(&reports) {
    let expected = 0.4 + 0.2 * x;
    assert!(
      (report.position.z - expected).abs() < 0.01,
      "Location x = {x}: got {}, expected {expected}",
      report.position.z
    );
    assert!((report.position.x - x).abs() < EPS, "Reports follow config order");
  }
}

#[test]
fn test_gas_tracking_gives_gas_column() {
  let location = DVec3::new(0.55, 0.45, 0.1);
  let config = probe_at(location).with_liquid(false);

  let report = evaluate_step(&config, GRAVITY, &workers(1)).unwrap()[0];

  assert!((report.height_above_boundary - 0.6).abs() < EPS);
}

#[test]
fn test_void_removes_its_length() {
  let void = DAabb3::new(DVec3::new(-1.0, -1.0, 0.1), DVec3::new(2.0, 2.0, 0.2));
  let fragment = tank().with_void(void);
  let workers = TankSubdomain::decomposed(&fragment, 2, 2, "alpha", surface());
  let location = DVec3::new(0.55, 0.45, 0.05);

  let report = evaluate_step(&probe_at(location), GRAVITY, &workers).unwrap()[0];

  // 0.1 of liquid below the void, 0.15 + 0.05 above it
  assert!((report.height_above_boundary - 0.3).abs() < EPS);
  assert!((report.position.z - 0.3).abs() < EPS);
}

// =============================================================================
// Batch 2: Decomposition and direction
// =============================================================================

#[test]
fn test_worker_count_does_not_change_result() {
  let config = ProbeConfig::new().with_locations([
    DVec3::new(0.55, 0.45, 0.1),
    DVec3::new(0.1, 0.9, 0.7),
    DVec3::new(0.8, 0.2, 0.4),
  ]);

  let single = evaluate_step(&config, GRAVITY, &workers(1)).unwrap();

  for parts in [2, 3, 4, 7, 30] {
    let split = evaluate_step(&config, GRAVITY, &workers(parts)).unwrap();
    for (a, b) in single.iter().zip(&split) {
      assert!(
        (a.height_above_boundary - b.height_above_boundary).abs() < EPS,
        "{parts} workers"
      );
      assert_eq!(a.boundary_height, b.boundary_height, "{parts} workers");
      assert!((a.position - b.position).length() < EPS, "{parts} workers");
    }
  }
}

#[test]
fn test_split_across_ray_does_not_change_result() {
  let location = DVec3::new(0.55, 0.45, 0.1);
  let across = TankSubdomain::decomposed(&tank(), 0, 4, "alpha", surface());

  let whole = evaluate_step(&probe_at(location), GRAVITY, &workers(1)).unwrap()[0];
  let split = evaluate_step(&probe_at(location), GRAVITY, &across).unwrap()[0];

  assert!((whole.height_above_boundary - split.height_above_boundary).abs() < EPS);
  assert_eq!(whole.boundary_height, split.boundary_height);
}

#[test]
fn test_location_on_seams_matches_single_worker() {
  // x = 0.5 and y = 0.5 are slab seams for 2 and 4 workers
  let config = ProbeConfig::new().with_locations([
    DVec3::new(0.5, 0.45, 0.1),
    DVec3::new(0.55, 0.5, 0.1),
    DVec3::new(0.5, 0.5, 0.1),
    DVec3::new(0.25, 0.75, 0.1),
  ]);
  let single = evaluate_step(&config, GRAVITY, &workers(1)).unwrap();

  for axis in [0, 1] {
    for parts in [2, 4] {
      let split = TankSubdomain::decomposed(&tank(), axis, parts, "alpha", surface());
      let reports = evaluate_step(&config, GRAVITY, &split).unwrap();

      for (a, b) in single.iter().zip(&reports) {
        assert!(
          (a.height_above_boundary - b.height_above_boundary).abs() < EPS,
          "axis {axis}, {parts} workers: {} vs {}",
          a.height_above_boundary,
          b.height_above_boundary
        );
        assert!((a.position - b.position).length() < EPS);
      }
    }
  }
}

#[test]
fn test_seam_corner_in_quadrant_decomposition() {
  let quadrants: Vec<TankSubdomain> = tank()
    .decompose(0, 2)
    .iter()
    .flat_map(|slab| slab.decompose(1, 2))
    .map(|fragment| TankSubdomain::new(fragment, "alpha", surface()))
    .collect();
  let config = probe_at(DVec3::new(0.5, 0.5, 0.1));

  let (reports, stats) = evaluate_step_timed(&config, GRAVITY, &quadrants).unwrap();

  assert!((reports[0].height_above_boundary - 0.4).abs() < EPS);
  assert!((reports[0].position.z - 0.4).abs() < EPS);
  assert_eq!(stats.sample_count, 41, "One column, sampled once");
}

#[test]
fn test_explicit_direction_overrides_ambient() {
  let location = DVec3::new(0.55, 0.45, 0.1);
  let config = probe_at(location).with_direction(DVec3::new(0.0, 0.0, -2.0));

  let explicit = evaluate_step(&config, DVec3::new(9.81, 0.0, 0.0), &workers(1)).unwrap()[0];
  let ambient = evaluate_step(&probe_at(location), GRAVITY, &workers(1)).unwrap()[0];

  assert_eq!(explicit, ambient);
}

#[test]
fn test_boxed_subdomains() {
  let boxed: Vec<Box<dyn Subdomain>> = workers(3)
    .into_iter()
    .map(|worker| Box::new(worker) as Box<dyn Subdomain>)
    .collect();
  let location = DVec3::new(0.55, 0.45, 0.1);

  let report = evaluate_step(&probe_at(location), GRAVITY, &boxed).unwrap()[0];

  assert!((report.position.z - 0.4).abs() < EPS);
}

#[test]
fn test_probe_location_with_constant_field() {
  let fragments = tank().decompose(2, 3);
  let interpolators: Vec<Box<dyn FieldInterpolator>> = fragments
    .iter()
    .map(|_| Box::new(ConstantField(0.5)) as Box<dyn FieldInterpolator>)
    .collect();
  let location = DVec3::new(0.55, 0.45, 0.25);

  let reduced = probe_location(location, DVec3::NEG_Z, 2.0, &fragments, &interpolators);

  assert!((reduced.sum_length - 1.0).abs() < EPS);
  assert!((reduced.sum_length_alpha - 0.5).abs() < EPS);
  assert!((reduced.boundary_height - 0.25).abs() < EPS);
}

// =============================================================================
// Batch 3: Not found and stats
// =============================================================================

#[test]
fn test_location_outside_domain_is_not_found() {
  let outside = DVec3::new(3.0, 0.45, 0.5);

  let report = evaluate_step(&probe_at(outside), GRAVITY, &workers(2)).unwrap()[0];

  assert!(!report.is_found());
  assert_ne!(report.height_above_location, 0.0);
}

#[test]
fn test_timed_step_stats() {
  let config = ProbeConfig::new().with_locations([
    DVec3::new(0.55, 0.45, 0.1),
    DVec3::new(3.0, 0.45, 0.5),
    DVec3::new(0.1, 0.9, 0.7),
  ]);

  let (reports, stats) = evaluate_step_timed(&config, GRAVITY, &workers(1)).unwrap();

  assert_eq!(stats.location_count, 3);
  assert_eq!(stats.not_found, 1);
  // 20 cells: 21 faces + 20 midpoints per column that hits
  assert_eq!(stats.sample_count, 2 * 41);
  assert_eq!(reports, evaluate_step(&config, GRAVITY, &workers(1)).unwrap());
}

// =============================================================================
// Batch 4: Configuration errors
// =============================================================================

#[test]
fn test_no_workers_rejected() {
  let none: Vec<TankSubdomain> = Vec::new();

  let result = evaluate_step(&probe_at(DVec3::ZERO), GRAVITY, &none);

  assert!(matches!(result, Err(ConfigurationError::NoSubdomains)));
}

#[test]
fn test_no_locations_rejected() {
  let result = evaluate_step(&ProbeConfig::new(), GRAVITY, &workers(1));

  assert!(matches!(result, Err(ConfigurationError::NoLocations)));
}

#[test]
fn test_unresolved_direction_rejected() {
  let result = evaluate_step(&probe_at(DVec3::ZERO), DVec3::ZERO, &workers(1));

  assert!(matches!(result, Err(ConfigurationError::UnresolvedDirection { .. })));
}

#[test]
fn test_unknown_field_rejected() {
  let config = probe_at(DVec3::new(0.5, 0.5, 0.5)).with_alpha("alpha.water");

  let result = evaluate_step(&config, GRAVITY, &workers(2));

  assert!(matches!(result, Err(ConfigurationError::UnknownField { .. })));
}

#[test]
fn test_unknown_scheme_rejected() {
  let config = probe_at(DVec3::new(0.5, 0.5, 0.5)).with_interpolation_scheme("cellPointFace");

  let result = evaluate_step(&config, GRAVITY, &workers(2));

  assert!(matches!(result, Err(ConfigurationError::UnknownScheme { .. })));
}
