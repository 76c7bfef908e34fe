//! Simple reference ray samplers and phase fields for testing and demos.
//!
//! These backends describe a rectangular tank on a uniform grid. They are easy
//! to verify by hand and exercise every path of the integrator: rays that miss
//! the domain, voids that split a ray into segments, and slab decompositions
//! where each worker only sees part of the ray.

use std::str::FromStr;

use glam::DVec3;

use crate::bounds::DAabb3;
use crate::error::{ConfigurationError, Result};
use crate::sampling::{FieldInterpolator, RaySampler, Subdomain};
use crate::types::{CellId, FaceId, RaySample, SegmentId, NO_CELL, NO_FACE};

/// Breakpoints closer than this (in ray parameter) are merged.
const MERGE_TOLERANCE: f64 = 1e-12;

// =============================================================================
// UniformGrid - global cell and face numbering
// =============================================================================

/// Uniform Cartesian grid over a box.
///
/// Cells use X-slowest, Z-fastest numbering: `id = (x * ny + y) * nz + z`.
/// Faces are numbered per axis, X faces first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformGrid {
  pub bounds: DAabb3,
  pub cells: [usize; 3],
}

impl UniformGrid {
  pub fn new(bounds: DAabb3, cells: [usize; 3]) -> Self {
    debug_assert!(cells.iter().all(|&n| n > 0), "Grid needs at least one cell per axis");
    Self { bounds, cells }
  }

  /// Cell spacing per axis.
  #[inline]
  pub fn spacing(&self) -> DVec3 {
    self.bounds.size() / DVec3::new(self.cells[0] as f64, self.cells[1] as f64, self.cells[2] as f64)
  }

  /// Total number of cells.
  pub fn cell_count(&self) -> usize {
    self.cells.iter().product()
  }

  /// Cell index along one axis, clamped into the grid.
  #[inline]
  fn cell_index(&self, axis: usize, coordinate: f64) -> usize {
    let h = self.spacing()[axis];
    let i = ((coordinate - self.bounds.min[axis]) / h).floor();
    (i.max(0.0) as usize).min(self.cells[axis] - 1)
  }

  /// Cell containing `point`, or [`NO_CELL`] outside the grid.
  pub fn cell_id(&self, point: DVec3) -> CellId {
    if !self.bounds.contains_point(point) {
      return NO_CELL;
    }
    let [_, ny, nz] = self.cells;
    let (ix, iy, iz) = (
      self.cell_index(0, point.x),
      self.cell_index(1, point.y),
      self.cell_index(2, point.z),
    );
    ((ix * ny + iy) * nz + iz) as CellId
  }

  /// Centre of a cell, or `None` for an id outside the grid.
  pub fn cell_centre(&self, cell: CellId) -> Option<DVec3> {
    if cell < 0 || cell as usize >= self.cell_count() {
      return None;
    }
    let [_, ny, nz] = self.cells;
    let id = cell as usize;
    let (ix, iy, iz) = (id / (ny * nz), (id / nz) % ny, id % nz);
    let index = DVec3::new(ix as f64, iy as f64, iz as f64) + DVec3::splat(0.5);
    Some(self.bounds.min + index * self.spacing())
  }

  /// Face of the grid plane normal to `axis` that `point` lies on.
  pub fn face_id(&self, axis: usize, point: DVec3) -> FaceId {
    let n = self.cells;
    let h = self.spacing();
    let plane = ((point[axis] - self.bounds.min[axis]) / h[axis]).round();
    let plane = (plane.max(0.0) as usize).min(n[axis]);

    let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
    let iu = self.cell_index(u, point[u]);
    let iv = self.cell_index(v, point[v]);

    let offset: usize = (0..axis)
      .map(|a| (n[a] + 1) * n[(a + 1) % 3] * n[(a + 2) % 3])
      .sum();
    (offset + (plane * n[u] + iu) * n[v] + iv) as FaceId
  }
}

// =============================================================================
// BoxFragment - reference RaySampler
// =============================================================================

/// What a ray breakpoint lies on.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Crossing {
  /// Grid plane normal to the given axis.
  GridPlane(usize),
  /// Void boundary or any other non-face point.
  Other,
}

#[derive(Clone, Copy, Debug)]
struct Breakpoint {
  t: f64,
  crossing: Crossing,
}

/// Block of grid cells owned by one worker, with optional voids.
///
/// Rays are sampled at every face crossing and every cell midpoint. Voids
/// (obstacles, holes) remove parts of the ray; the sub-ray after a void gets
/// the next segment id.
#[derive(Clone, Debug)]
pub struct BoxFragment {
  grid: UniformGrid,
  /// Owned cell range per axis, `lo..hi`.
  lo: [usize; 3],
  hi: [usize; 3],
  voids: Vec<DAabb3>,
}

impl BoxFragment {
  /// Fragment owning the whole grid.
  pub fn new(grid: UniformGrid) -> Self {
    Self {
      grid,
      lo: [0; 3],
      hi: grid.cells,
      voids: Vec::new(),
    }
  }

  /// Cut a box-shaped void out of the domain.
  pub fn with_void(mut self, void: DAabb3) -> Self {
    self.voids.push(void);
    self
  }

  /// Returns true if the fragment owns no cells.
  pub fn is_empty(&self) -> bool {
    (0..3).any(|axis| self.lo[axis] >= self.hi[axis])
  }

  /// Split into `parts` slabs along `axis` at cell boundaries.
  ///
  /// Always returns exactly `parts` fragments. When there are more parts than
  /// cells some fragments own nothing; they still take part in reductions.
  pub fn decompose(&self, axis: usize, parts: usize) -> Vec<BoxFragment> {
    let parts = parts.max(1);
    let axis = axis.min(2);
    let (lo, hi) = (self.lo[axis], self.hi[axis]);
    let span = hi.saturating_sub(lo);

    (0..parts)
      .map(|i| {
        let mut fragment = self.clone();
        fragment.lo[axis] = lo + span * i / parts;
        fragment.hi[axis] = lo + span * (i + 1) / parts;
        fragment
      })
      .collect()
  }

  /// Ray breakpoints inside `t_enter..=t_exit`, sorted and merged.
  fn breakpoints(&self, start: DVec3, end: DVec3, t_enter: f64, t_exit: f64) -> Vec<Breakpoint> {
    let delta = end - start;
    let h = self.grid.spacing();
    let mut points = vec![
      Breakpoint {
        t: t_enter,
        crossing: self.crossing_at(start + delta * t_enter, delta),
      },
      Breakpoint {
        t: t_exit,
        crossing: self.crossing_at(start + delta * t_exit, delta),
      },
    ];

    for axis in 0..3 {
      let d = delta[axis];
      if d == 0.0 {
        continue;
      }
      for plane in self.lo[axis]..=self.hi[axis] {
        let coordinate = self.grid.bounds.min[axis] + plane as f64 * h[axis];
        let t = (coordinate - start[axis]) / d;
        if t > t_enter && t < t_exit {
          points.push(Breakpoint {
            t,
            crossing: Crossing::GridPlane(axis),
          });
        }
      }
    }

    for void in &self.voids {
      if let Some((v_enter, v_exit)) = void.clip_segment(start, end) {
        for t in [v_enter, v_exit] {
          if t > t_enter && t < t_exit {
            points.push(Breakpoint {
              t,
              crossing: Crossing::Other,
            });
          }
        }
      }
    }

    points.sort_by(|a, b| a.t.total_cmp(&b.t));

    let mut merged: Vec<Breakpoint> = Vec::with_capacity(points.len());
    for point in points {
      match merged.last_mut() {
        Some(last) if point.t - last.t <= MERGE_TOLERANCE => {
          if last.crossing == Crossing::Other {
            last.crossing = point.crossing;
          }
        }
        _ => merged.push(point),
      }
    }
    merged
  }

  /// Classify an entry or exit point of a ray moving along `delta`.
  ///
  /// A point on several grid planes (an edge or corner) is attributed to the
  /// plane the ray crosses most steeply.
  fn crossing_at(&self, point: DVec3, delta: DVec3) -> Crossing {
    let h = self.grid.spacing();
    (0..3)
      .filter(|&axis| delta[axis] != 0.0)
      .filter(|&axis| {
        let plane = (point[axis] - self.grid.bounds.min[axis]) / h[axis];
        (plane - plane.round()).abs() * h[axis] <= MERGE_TOLERANCE * h[axis].max(1.0)
      })
      .max_by(|&a, &b| delta[a].abs().total_cmp(&delta[b].abs()))
      .map_or(Crossing::Other, Crossing::GridPlane)
  }

  /// Returns false for a ray lying in an interior seam on this fragment's
  /// upper side.
  ///
  /// Seams are half-open for rays that never cross them: the fragment above
  /// owns the ray, so the column is not sampled twice.
  fn owns_tangent_ray(&self, start: DVec3, delta: DVec3) -> bool {
    let max = self.bounds().max;
    (0..3).all(|axis| {
      delta[axis] != 0.0 || self.hi[axis] == self.grid.cells[axis] || start[axis] < max[axis]
    })
  }

  fn face_sample(&self, point: DVec3, crossing: Crossing, cell: CellId, segment: SegmentId) -> RaySample {
    let face = match crossing {
      Crossing::GridPlane(axis) => self.grid.face_id(axis, point),
      Crossing::Other => NO_FACE,
    };
    RaySample::new(point, cell, face, segment)
  }

  fn in_void(&self, point: DVec3) -> bool {
    self.voids.iter().any(|void| void.contains_point(point))
  }
}

impl RaySampler for BoxFragment {
  fn bounds(&self) -> DAabb3 {
    if self.is_empty() {
      return DAabb3::empty();
    }
    let h = self.grid.spacing();
    let to_point = |index: [usize; 3]| {
      self.grid.bounds.min + DVec3::new(index[0] as f64, index[1] as f64, index[2] as f64) * h
    };
    DAabb3::new(to_point(self.lo), to_point(self.hi))
  }

  fn sample_ray(&self, start: DVec3, end: DVec3) -> Vec<RaySample> {
    let Some((t_enter, t_exit)) = self.bounds().clip_segment(start, end) else {
      return Vec::new();
    };
    if t_exit - t_enter <= MERGE_TOLERANCE {
      return Vec::new();
    }

    let delta = end - start;
    if !self.owns_tangent_ray(start, delta) {
      return Vec::new();
    }
    let breakpoints = self.breakpoints(start, end, t_enter, t_exit);

    let mut samples = Vec::with_capacity(breakpoints.len() * 2);
    let mut segment: SegmentId = 0;
    let mut after_gap = false;
    let mut last_t: Option<f64> = None;

    for pair in breakpoints.windows(2) {
      let (a, b) = (pair[0], pair[1]);
      let midpoint = start + delta * (0.5 * (a.t + b.t));

      if self.in_void(midpoint) {
        after_gap = true;
        continue;
      }
      if after_gap {
        if !samples.is_empty() {
          segment += 1;
        }
        after_gap = false;
      }

      let cell = self.grid.cell_id(midpoint);
      if last_t != Some(a.t) {
        samples.push(self.face_sample(start + delta * a.t, a.crossing, cell, segment));
      }
      samples.push(RaySample::midpoint(midpoint, cell, segment));
      samples.push(self.face_sample(start + delta * b.t, b.crossing, cell, segment));
      last_t = Some(b.t);
    }

    samples
  }
}

// =============================================================================
// Phase fields
// =============================================================================

/// Planar free surface with a linear smearing band.
///
/// Liquid sits below the surface (against `up`). The surface height above the
/// origin is `level + slope · p`, so a non-zero `slope` tilts it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreeSurfaceField {
  /// Unit vector pointing from liquid to gas.
  pub up: DVec3,
  /// Surface height at the origin, measured along `up`.
  pub level: f64,
  /// Surface height gradient.
  pub slope: DVec3,
  /// Width of the band over which alpha drops from 1 to 0.
  pub thickness: f64,
}

impl FreeSurfaceField {
  /// Flat, sharp surface.
  pub fn level(up: DVec3, level: f64) -> Self {
    Self {
      up: up.normalize_or_zero(),
      level,
      slope: DVec3::ZERO,
      thickness: 0.0,
    }
  }

  pub fn with_slope(mut self, slope: DVec3) -> Self {
    self.slope = slope;
    self
  }

  pub fn with_thickness(mut self, thickness: f64) -> Self {
    self.thickness = thickness.max(0.0);
    self
  }

  /// Surface height above the origin below/above `point`.
  #[inline]
  pub fn surface_height(&self, point: DVec3) -> f64 {
    self.level + self.slope.dot(point)
  }

  /// Liquid fraction at `point`.
  pub fn alpha_at(&self, point: DVec3) -> f64 {
    let above = self.up.dot(point) - self.surface_height(point);
    if self.thickness > 0.0 {
      (0.5 - above / self.thickness).clamp(0.0, 1.0)
    } else if above < 0.0 {
      1.0
    } else {
      0.0
    }
  }
}

/// Uniform phase fraction, independent of position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantField(pub f64);

impl FieldInterpolator for ConstantField {
  #[inline]
  fn interpolate(&self, _sample: &RaySample) -> f64 {
    self.0
  }
}

/// Interpolation schemes understood by the reference subdomains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationScheme {
  /// Value of the owning cell's centre.
  Cell,
  /// Exact value at the sample point.
  CellPoint,
}

impl FromStr for InterpolationScheme {
  type Err = ConfigurationError;

  fn from_str(name: &str) -> Result<Self> {
    match name {
      "cell" => Ok(Self::Cell),
      "cellPoint" => Ok(Self::CellPoint),
      other => Err(ConfigurationError::UnknownScheme {
        name: other.to_string(),
      }),
    }
  }
}

struct SurfaceInterpolator<'a> {
  grid: &'a UniformGrid,
  field: &'a FreeSurfaceField,
  scheme: InterpolationScheme,
}

impl FieldInterpolator for SurfaceInterpolator<'_> {
  fn interpolate(&self, sample: &RaySample) -> f64 {
    let point = match self.scheme {
      InterpolationScheme::CellPoint => sample.position,
      InterpolationScheme::Cell => self.grid.cell_centre(sample.cell).unwrap_or(sample.position),
    };
    self.field.alpha_at(point)
  }
}

// =============================================================================
// TankSubdomain - reference Subdomain
// =============================================================================

/// One worker's fragment of a tank holding a single named phase field.
#[derive(Clone, Debug)]
pub struct TankSubdomain {
  pub fragment: BoxFragment,
  pub field_name: String,
  pub field: FreeSurfaceField,
}

impl TankSubdomain {
  pub fn new(fragment: BoxFragment, field_name: impl Into<String>, field: FreeSurfaceField) -> Self {
    Self {
      fragment,
      field_name: field_name.into(),
      field,
    }
  }

  /// Decompose a whole-tank fragment into `parts` workers sharing one field.
  pub fn decomposed(
    fragment: &BoxFragment,
    axis: usize,
    parts: usize,
    field_name: &str,
    field: FreeSurfaceField,
  ) -> Vec<TankSubdomain> {
    fragment
      .decompose(axis, parts)
      .into_iter()
      .map(|piece| TankSubdomain::new(piece, field_name, field))
      .collect()
  }
}

impl RaySampler for TankSubdomain {
  fn bounds(&self) -> DAabb3 {
    self.fragment.bounds()
  }

  fn sample_ray(&self, start: DVec3, end: DVec3) -> Vec<RaySample> {
    self.fragment.sample_ray(start, end)
  }
}

impl Subdomain for TankSubdomain {
  fn interpolator(&self, field: &str, scheme: &str) -> Result<Box<dyn FieldInterpolator + '_>> {
    if field != self.field_name {
      return Err(ConfigurationError::UnknownField {
        name: field.to_string(),
      });
    }
    let scheme = scheme.parse::<InterpolationScheme>()?;
    Ok(Box::new(SurfaceInterpolator {
      grid: &self.fragment.grid,
      field: &self.field,
      scheme,
    }))
  }
}

#[cfg(test)]
#[path = "samplers_test.rs"]
mod samplers_test;
