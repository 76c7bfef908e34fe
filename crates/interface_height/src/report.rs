//! Interface report assembly from reduced integrals.

use glam::DVec3;

use crate::types::{InterfaceReport, ReducedIntegral};

/// Derive interface heights and position for one location.
///
/// - height above boundary = equivalent liquid length
/// - height above location = height above boundary - boundary height
/// - position = location - direction * height above location
///
/// Nothing is clamped. For a location outside the domain the sentinel
/// boundary height turns the heights and position non-finite, and
/// [`InterfaceReport::is_found`] returns false.
pub fn assemble(
  location: DVec3,
  direction: DVec3,
  liquid_is_tracked: bool,
  reduced: &ReducedIntegral,
) -> InterfaceReport {
  let height_above_boundary = reduced.liquid_length(liquid_is_tracked);
  let height_above_location = height_above_boundary - reduced.boundary_height;
  let position = location - direction * height_above_location;

  InterfaceReport {
    height_above_boundary,
    height_above_location,
    position,
    boundary_height: reduced.boundary_height,
  }
}
