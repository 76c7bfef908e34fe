//! Configuration parsing for interface probe runs.

use anyhow::{Context, Result};
use interface_height::ProbeConfig;
use serde::Deserialize;
use std::path::Path;

/// Root configuration for a probe run.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Probe definition passed to the integrator unchanged.
	pub probe: ProbeConfig,
	/// Reference tank the probes sample.
	#[serde(default)]
	pub scenario: ScenarioConfig,
	/// Time stepping and decomposition.
	#[serde(default)]
	pub run: RunConfig,
}

/// Sloshing tank on a uniform grid.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
	/// Tank lower corner.
	pub min: [f64; 3],
	/// Tank upper corner.
	pub max: [f64; 3],
	/// Cells per axis.
	pub cells: [usize; 3],
	/// Name the phase field is stored under.
	pub field: String,
	/// Mean free-surface height above `min`, measured against gravity.
	pub level: f64,
	/// Width of the smeared interface band.
	pub thickness: f64,
	/// Peak surface slope along x.
	pub amplitude: f64,
	/// Sloshing period in seconds.
	pub period: f64,
	/// Gravitational acceleration.
	pub gravity: [f64; 3],
	/// Box-shaped obstacles cut out of the tank.
	pub voids: Vec<VoidConfig>,
}

impl Default for ScenarioConfig {
	fn default() -> Self {
		Self {
			min: [0.0; 3],
			max: [1.0; 3],
			cells: [16, 16, 32],
			field: "alpha".to_string(),
			level: 0.5,
			thickness: 0.0,
			amplitude: 0.0,
			period: 1.0,
			gravity: [0.0, 0.0, -9.81],
			voids: Vec::new(),
		}
	}
}

/// Obstacle bounds.
#[derive(Debug, Deserialize)]
pub struct VoidConfig {
	pub min: [f64; 3],
	pub max: [f64; 3],
}

/// Time stepping and worker layout.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
	pub start_time: f64,
	pub end_time: f64,
	/// Time between reporting steps.
	pub write_interval: f64,
	/// Number of workers the tank is split into.
	pub workers: usize,
	/// Axis the tank is split along (0 = x, 1 = y, 2 = z).
	pub decompose_axis: usize,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			start_time: 0.0,
			end_time: 1.0,
			write_interval: 0.1,
			workers: 1,
			decompose_axis: 2,
		}
	}
}

impl RunConfig {
	/// Reporting times from start to end, inclusive.
	pub fn step_times(&self) -> Vec<f64> {
		let span = self.end_time - self.start_time;
		let steps = (span / self.write_interval + 1e-9).floor() as usize;
		(0..=steps)
			.map(|i| self.start_time + i as f64 * self.write_interval)
			.collect()
	}
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration from TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		config.probe.validate().context("Invalid [probe] section")?;

		let scenario = &config.scenario;
		if scenario.cells.iter().any(|&n| n == 0) {
			anyhow::bail!("scenario.cells must be non-zero, got {:?}", scenario.cells);
		}
		if (0..3).any(|axis| scenario.min[axis] >= scenario.max[axis]) {
			anyhow::bail!(
				"scenario.min must lie below scenario.max, got {:?} and {:?}",
				scenario.min,
				scenario.max
			);
		}
		if scenario.period <= 0.0 {
			anyhow::bail!("scenario.period must be positive, got {}", scenario.period);
		}
		if scenario.thickness < 0.0 {
			anyhow::bail!("scenario.thickness must not be negative, got {}", scenario.thickness);
		}

		let run = &config.run;
		if run.workers == 0 {
			anyhow::bail!("run.workers must be at least 1");
		}
		if run.decompose_axis > 2 {
			anyhow::bail!("run.decompose_axis must be 0, 1 or 2, got {}", run.decompose_axis);
		}
		if run.write_interval <= 0.0 {
			anyhow::bail!("run.write_interval must be positive, got {}", run.write_interval);
		}
		if run.end_time < run.start_time {
			anyhow::bail!(
				"run.end_time {} is before run.start_time {}",
				run.end_time,
				run.start_time
			);
		}

		Ok(config)
	}
}
