//! Core data types for ray sampling and interface height integration.

use glam::DVec3;

/// Index of the cell owning a ray sample.
pub type CellId = i64;

/// Index of the face a ray sample lies on.
pub type FaceId = i64;

/// Tag grouping contiguous samples of one physically connected sub-ray.
pub type SegmentId = i64;

/// Cell id for samples that are not inside any cell.
pub const NO_CELL: CellId = -1;

/// Face id for samples that are not on a face (cell midpoints).
pub const NO_FACE: FaceId = -1;

/// Boundary height of a ray with no samples.
///
/// Negative infinity is the identity of the max reduction, so workers without
/// data never win it. A reduced result still carrying this value means the
/// location lies outside the sampled domain.
pub const NO_BOUNDARY: f64 = f64::NEG_INFINITY;

/// One point of an ordered ray sample sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySample {
  /// Sample position in domain coordinates.
  pub position: DVec3,

  /// Cell containing the sample.
  pub cell: CellId,

  /// Face the sample lies on, or [`NO_FACE`].
  pub face: FaceId,

  /// Sub-ray tag. Consecutive samples are connected iff their segments match.
  pub segment: SegmentId,
}

impl RaySample {
  pub fn new(position: DVec3, cell: CellId, face: FaceId, segment: SegmentId) -> Self {
    Self {
      position,
      cell,
      face,
      segment,
    }
  }

  /// Sample inside a cell, away from faces.
  pub fn midpoint(position: DVec3, cell: CellId, segment: SegmentId) -> Self {
    Self::new(position, cell, NO_FACE, segment)
  }
}

/// Ray sample with its interpolated phase fraction.
///
/// `alpha` is nominally in [0, 1]. Interpolation over/undershoot is kept as is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolatedSample {
  pub sample: RaySample,
  pub alpha: f64,
}

impl InterpolatedSample {
  pub fn new(sample: RaySample, alpha: f64) -> Self {
    Self { sample, alpha }
  }

  #[inline]
  pub fn position(&self) -> DVec3 {
    self.sample.position
  }

  #[inline]
  pub fn segment(&self) -> SegmentId {
    self.sample.segment
  }
}

/// Integrals accumulated by one worker from the samples it owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartialIntegral {
  /// Sampled ray length, measured against the height direction.
  pub sum_length: f64,

  /// Trapezoidal integral of alpha over the sampled length.
  pub sum_length_alpha: f64,

  /// Height of the query location above the first sample, or [`NO_BOUNDARY`].
  pub boundary_height: f64,
}

impl PartialIntegral {
  /// Contribution of a worker that sampled nothing.
  pub const EMPTY: Self = Self {
    sum_length: 0.0,
    sum_length_alpha: 0.0,
    boundary_height: NO_BOUNDARY,
  };

  pub fn new(sum_length: f64, sum_length_alpha: f64, boundary_height: f64) -> Self {
    Self {
      sum_length,
      sum_length_alpha,
      boundary_height,
    }
  }

  /// Returns true if this worker sampled at least one point.
  pub fn has_samples(&self) -> bool {
    self.boundary_height != NO_BOUNDARY
  }
}

impl Default for PartialIntegral {
  fn default() -> Self {
    Self::EMPTY
  }
}

/// Global combination of all partial integrals for one query location.
///
/// Only produced by the reducers in [`crate::reduce`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReducedIntegral {
  pub sum_length: f64,
  pub sum_length_alpha: f64,
  pub boundary_height: f64,
}

impl ReducedIntegral {
  pub(crate) fn from_partial(partial: PartialIntegral) -> Self {
    Self {
      sum_length: partial.sum_length,
      sum_length_alpha: partial.sum_length_alpha,
      boundary_height: partial.boundary_height,
    }
  }

  /// Returns false when no worker sampled the location's ray.
  pub fn is_found(&self) -> bool {
    self.boundary_height != NO_BOUNDARY
  }

  /// Equivalent liquid column length.
  ///
  /// When the tracked phase is the gas, the liquid column is the complement of
  /// the tracked integral.
  #[inline]
  pub fn liquid_length(&self, liquid_is_tracked: bool) -> f64 {
    if liquid_is_tracked {
      self.sum_length_alpha
    } else {
      self.sum_length - self.sum_length_alpha
    }
  }
}

/// Interface height and position for one query location at one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterfaceReport {
  /// Interface height above the first sampled point of the ray.
  pub height_above_boundary: f64,

  /// Interface height above the query location.
  pub height_above_location: f64,

  /// Interface position on the ray through the location.
  pub position: DVec3,

  /// Reduced boundary height the report was derived from.
  pub boundary_height: f64,
}

impl InterfaceReport {
  /// Returns false for locations outside the sampled domain.
  ///
  /// Such reports carry non-finite heights and positions.
  pub fn is_found(&self) -> bool {
    self.boundary_height != NO_BOUNDARY
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
