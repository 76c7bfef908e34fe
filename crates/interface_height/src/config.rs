//! ProbeConfig - configuration for interface height probes.

use glam::DVec3;
use serde::Deserialize;

use crate::error::{ConfigurationError, Result};

/// Default name of the phase-fraction field.
pub const DEFAULT_ALPHA: &str = "alpha";

/// Default interpolation scheme name.
pub const DEFAULT_INTERPOLATION_SCHEME: &str = "cellPoint";

/// Configuration for interface height probes.
///
/// Deserializes from TOML with every entry except `locations` optional:
///
/// ```toml
/// alpha = "alpha.water"
/// liquid = true
/// interpolation_scheme = "cellPoint"
/// direction = [0.0, 0.0, 0.0]
/// locations = [[0.5, 0.5, 0.1], [0.25, 0.5, 0.1]]
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
  /// Name of the phase-fraction field to sample.
  pub alpha: String,

  /// True if `alpha` is the liquid fraction, false if it tracks the gas.
  pub liquid: bool,

  /// Interpolation scheme requested from the subdomains.
  pub interpolation_scheme: String,

  /// Height direction. Zero means "use the ambient field".
  pub direction: DVec3,

  /// Ordered query locations. Report order follows this list.
  pub locations: Vec<DVec3>,
}

impl Default for ProbeConfig {
  fn default() -> Self {
    Self {
      alpha: DEFAULT_ALPHA.to_string(),
      liquid: true,
      interpolation_scheme: DEFAULT_INTERPOLATION_SCHEME.to_string(),
      direction: DVec3::ZERO,
      locations: Vec::new(),
    }
  }
}

impl ProbeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_alpha(mut self, name: impl Into<String>) -> Self {
    self.alpha = name.into();
    self
  }

  pub fn with_liquid(mut self, liquid: bool) -> Self {
    self.liquid = liquid;
    self
  }

  pub fn with_interpolation_scheme(mut self, scheme: impl Into<String>) -> Self {
    self.interpolation_scheme = scheme.into();
    self
  }

  pub fn with_direction(mut self, direction: DVec3) -> Self {
    self.direction = direction;
    self
  }

  pub fn with_locations(mut self, locations: impl IntoIterator<Item = DVec3>) -> Self {
    self.locations = locations.into_iter().collect();
    self
  }

  /// Append one query location.
  pub fn with_location(mut self, location: DVec3) -> Self {
    self.locations.push(location);
    self
  }

  /// Parse and validate a TOML document.
  pub fn from_toml_str(text: &str) -> Result<Self> {
    let config: ProbeConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  /// Check everything that can be checked without a domain.
  ///
  /// Direction resolution needs the ambient field and happens per step.
  pub fn validate(&self) -> Result<()> {
    if self.alpha.trim().is_empty() {
      return Err(ConfigurationError::EmptyName { entry: "alpha" });
    }
    if self.interpolation_scheme.trim().is_empty() {
      return Err(ConfigurationError::EmptyName {
        entry: "interpolation_scheme",
      });
    }
    if !self.direction.is_finite() {
      return Err(ConfigurationError::NonFiniteVector {
        what: "direction",
        value: self.direction.to_array(),
      });
    }
    if self.locations.is_empty() {
      return Err(ConfigurationError::NoLocations);
    }
    if let Some((index, location)) = self
      .locations
      .iter()
      .enumerate()
      .find(|(_, location)| !location.is_finite())
    {
      return Err(ConfigurationError::NonFiniteLocation {
        index,
        location: location.to_array(),
      });
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
