//! Height axis resolution.

use glam::DVec3;

use crate::error::{ConfigurationError, Result};

/// Resolve the unit vector along which heights are measured.
///
/// A non-zero `direction` wins. Otherwise the ambient field (gravity) is used.
/// The result points along gravity in the usual setup, so heights grow against
/// it.
///
/// # Errors
/// [`ConfigurationError::UnresolvedDirection`] if both vectors are zero-length,
/// [`ConfigurationError::NonFiniteVector`] if the vector in use is not finite.
pub fn resolve_direction(direction: DVec3, ambient: DVec3) -> Result<DVec3> {
  if !direction.is_finite() {
    return Err(ConfigurationError::NonFiniteVector {
      what: "direction",
      value: direction.to_array(),
    });
  }

  let magnitude = direction.length();
  if magnitude > 0.0 {
    return Ok(direction / magnitude);
  }

  if !ambient.is_finite() {
    return Err(ConfigurationError::NonFiniteVector {
      what: "ambient field",
      value: ambient.to_array(),
    });
  }

  let ambient_magnitude = ambient.length();
  if ambient_magnitude > 0.0 {
    return Ok(ambient / ambient_magnitude);
  }

  Err(ConfigurationError::UnresolvedDirection {
    direction: direction.to_array(),
    ambient: ambient.to_array(),
  })
}

#[cfg(test)]
#[path = "direction_test.rs"]
mod direction_test;
