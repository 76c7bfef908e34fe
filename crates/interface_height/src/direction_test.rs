use glam::DVec3;

use super::*;

const GRAVITY: DVec3 = DVec3::new(0.0, 0.0, -9.81);

#[test]
fn test_user_direction_wins() {
  let resolved = resolve_direction(DVec3::new(0.0, -2.0, 0.0), GRAVITY).unwrap();
  assert_eq!(resolved, DVec3::NEG_Y);
}

#[test]
fn test_zero_direction_falls_back_to_gravity() {
  let resolved = resolve_direction(DVec3::ZERO, GRAVITY).unwrap();
  assert_eq!(resolved, DVec3::NEG_Z);
}

#[test]
fn test_result_is_unit_length() {
  let resolved = resolve_direction(DVec3::new(3.0, 4.0, 12.0), GRAVITY).unwrap();
  assert!((resolved.length() - 1.0).abs() < 1e-12);
  assert!((resolved - DVec3::new(3.0, 4.0, 12.0) / 13.0).length() < 1e-12);
}

#[test]
fn test_both_zero_is_configuration_error() {
  let err = resolve_direction(DVec3::ZERO, DVec3::ZERO).unwrap_err();
  assert!(
    matches!(err, ConfigurationError::UnresolvedDirection { .. }),
    "Expected UnresolvedDirection, got {err:?}"
  );
}

#[test]
fn test_non_finite_direction_rejected() {
  let err = resolve_direction(DVec3::new(f64::NAN, 0.0, 1.0), GRAVITY).unwrap_err();
  assert!(matches!(
    err,
    ConfigurationError::NonFiniteVector {
      what: "direction",
      ..
    }
  ));
}

#[test]
fn test_non_finite_ambient_rejected_only_when_used() {
  let ambient = DVec3::new(0.0, 0.0, f64::INFINITY);

  assert!(resolve_direction(DVec3::X, ambient).is_ok());
  assert!(matches!(
    resolve_direction(DVec3::ZERO, ambient),
    Err(ConfigurationError::NonFiniteVector {
      what: "ambient field",
      ..
    })
  ));
}

/// Ambient field may change between steps; nothing is cached.
#[test]
fn test_ambient_change_is_picked_up() {
  let first = resolve_direction(DVec3::ZERO, GRAVITY).unwrap();
  let second = resolve_direction(DVec3::ZERO, DVec3::new(9.81, 0.0, 0.0)).unwrap();

  assert_eq!(first, DVec3::NEG_Z);
  assert_eq!(second, DVec3::X);
}
