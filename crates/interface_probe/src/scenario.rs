//! Sloshing reference tank.
//!
//! The free surface rocks about the tank centre with a sinusoidal slope along
//! x, so probes at either end see the interface rise and fall out of phase.

use glam::DVec3;
use interface_height::samplers::{BoxFragment, FreeSurfaceField, TankSubdomain, UniformGrid};
use interface_height::DAabb3;

use crate::config::{RunConfig, ScenarioConfig};

impl ScenarioConfig {
	pub fn gravity(&self) -> DVec3 {
		DVec3::from_array(self.gravity)
	}

	fn bounds(&self) -> DAabb3 {
		DAabb3::new(DVec3::from_array(self.min), DVec3::from_array(self.max))
	}

	/// Free surface at `time`.
	pub fn surface_at(&self, time: f64) -> FreeSurfaceField {
		let up = -self.gravity().normalize_or_zero();
		let bounds = self.bounds();
		let slope = DVec3::X * self.amplitude * (std::f64::consts::TAU * time / self.period).sin();

		// Pivot the tilt about the tank centre so the mean level stays put
		let base = up.dot(bounds.min) + self.level - slope.dot(bounds.center());

		FreeSurfaceField::level(up, base)
			.with_slope(slope)
			.with_thickness(self.thickness)
	}

	/// Whole tank with its obstacles, owned by one worker.
	pub fn fragment(&self) -> BoxFragment {
		let grid = UniformGrid::new(self.bounds(), self.cells);
		self.voids.iter().fold(BoxFragment::new(grid), |fragment, void| {
			fragment.with_void(DAabb3::new(DVec3::from_array(void.min), DVec3::from_array(void.max)))
		})
	}

	/// Decomposed workers holding the surface at `time`.
	pub fn workers_at(&self, fragment: &BoxFragment, run: &RunConfig, time: f64) -> Vec<TankSubdomain> {
		TankSubdomain::decomposed(
			fragment,
			run.decompose_axis,
			run.workers,
			&self.field,
			self.surface_at(time),
		)
	}
}
