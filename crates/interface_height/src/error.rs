//! Configuration errors for interface height probes.
//!
//! Everything that can fail in this crate is a configuration problem that is
//! detected before any ray is sampled. Locations outside the domain are not
//! errors; they surface as reports with [`crate::NO_BOUNDARY`].

use thiserror::Error;

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Problems that prevent a reporting step from being evaluated.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  /// Neither the configured direction nor the ambient field define an axis.
  #[error(
    "cannot resolve the height direction: direction {direction:?} and ambient field {ambient:?} are both zero-length"
  )]
  UnresolvedDirection { direction: [f64; 3], ambient: [f64; 3] },

  /// A direction vector contains NaN or infinity.
  #[error("{what} vector is not finite: {value:?}")]
  NonFiniteVector { what: &'static str, value: [f64; 3] },

  /// The location list is empty.
  #[error("at least one query location is required")]
  NoLocations,

  /// A location contains NaN or infinity.
  #[error("query location {index} is not finite: {location:?}")]
  NonFiniteLocation { index: usize, location: [f64; 3] },

  /// A required name entry is blank.
  #[error("`{entry}` must not be empty")]
  EmptyName { entry: &'static str },

  /// A subdomain does not hold the requested phase field.
  #[error("field `{name}` is not available")]
  UnknownField { name: String },

  /// A subdomain cannot build the requested interpolation scheme.
  #[error("unknown interpolation scheme `{name}`")]
  UnknownScheme { name: String },

  /// A reporting step was requested without any worker fragments.
  #[error("no subdomains to sample")]
  NoSubdomains,

  /// The configuration text could not be parsed.
  #[error("failed to parse probe configuration: {0}")]
  Parse(#[from] toml::de::Error),
}
