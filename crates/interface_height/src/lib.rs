//! interface_height - Engine independent free-surface height probes
//!
//! This crate measures where a two-phase interface (typically a free water
//! surface) sits above a set of query locations. For every location a ray is
//! cast along the height axis through the whole domain, the phase fraction is
//! interpolated at the ray samples, and the trapezoidal integral of the phase
//! fraction gives the length of an equivalent column of pure liquid.
//!
//! # Features
//!
//! - **Segment-aware integration**: rays that leave and re-enter the domain
//!   (voids, holes, decomposition seams) are never integrated across gaps
//! - **Decomposition independent**: per-worker partial integrals combine with
//!   associative max/sum reductions
//! - **Pluggable backends**: ray sampling and field interpolation are
//!   capability traits ([`RaySampler`], [`FieldInterpolator`], [`Subdomain`])
//! - **Reference backends**: uniform box grids with voids and planar free
//!   surfaces in [`samplers`] for tests, benches and demos
//!
//! # Example
//!
//! ```ignore
//! use glam::DVec3;
//! use interface_height::{evaluate_step, DAabb3, ProbeConfig};
//! use interface_height::samplers::{BoxFragment, FreeSurfaceField, TankSubdomain, UniformGrid};
//!
//! let grid = UniformGrid::new(DAabb3::new(DVec3::ZERO, DVec3::ONE), [8, 8, 32]);
//! let surface = FreeSurfaceField::level(DVec3::Z, 0.4);
//! let workers: Vec<_> = BoxFragment::new(grid)
//!     .decompose(2, 4)
//!     .into_iter()
//!     .map(|fragment| TankSubdomain::new(fragment, "alpha", surface))
//!     .collect();
//!
//! let config = ProbeConfig::new().with_location(DVec3::new(0.5, 0.5, 0.1));
//! let reports = evaluate_step(&config, DVec3::new(0.0, 0.0, -9.81), &workers)?;
//!
//! println!("interface at {:?}", reports[0].position);
//! ```

pub mod bounds;
pub mod config;
pub mod direction;
pub mod error;
pub mod integrate;
pub mod reduce;
pub mod report;
pub mod sampling;
pub mod types;

// Re-export commonly used items
pub use bounds::DAabb3;
pub use config::ProbeConfig;
pub use direction::resolve_direction;
pub use error::{ConfigurationError, Result};
pub use integrate::integrate;
pub use reduce::{reduce, reduce_parallel};
pub use report::assemble;
pub use sampling::{
  interpolate_samples, ray_extent, FieldInterpolator, Ray, RaySampler, Subdomain,
};
pub use types::{
  CellId, FaceId, InterfaceReport, InterpolatedSample, PartialIntegral, RaySample,
  ReducedIntegral, SegmentId, NO_BOUNDARY, NO_CELL, NO_FACE,
};

// Reporting step orchestration
pub mod pipeline;
pub use pipeline::{evaluate_step, evaluate_step_timed, probe_location, StepStats};

// Reference ray samplers and phase fields
pub mod samplers;
