//! Interface height probe driver.
//!
//! Runs a sloshing reference tank through a sequence of reporting steps and
//! records where the free surface crosses each configured probe line.
//!
//! Writes `heights.dat` and `positions.dat` to the output directory.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=interface_probe=info` - One line per reporting step
//! - `RUST_LOG=interface_height=debug` - Probes whose ray misses the tank
//! - `RUST_LOG=trace` - Everything, including pipeline spans

mod config;
mod report;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use interface_height::evaluate_step_timed;
use report::{ReportWriter, Table};

/// Interface height probe driver.
#[derive(Parser, Debug)]
#[command(name = "interface_probe")]
#[command(about = "Samples free-surface heights in a sloshing reference tank")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Output directory (default: next to the config file).
	#[arg(short, long)]
	output_dir: Option<PathBuf>,

	/// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
	#[arg(long, short, action = clap::ArgAction::Count)]
	verbose: u8,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8) {
	// RUST_LOG wins over -v flags
	let filter = if std::env::var("RUST_LOG").is_ok() {
		EnvFilter::from_default_env()
	} else {
		let level = match verbose {
			0 => "warn",
			1 => "interface_probe=info,interface_height=info",
			2 => "interface_probe=debug,interface_height=debug",
			_ => "trace",
		};
		EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr).compact())
		.with(filter)
		.init();
}

fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(args.verbose);

	let output_dir = args.output_dir.unwrap_or_else(|| {
		args.config
			.parent()
			.unwrap_or(Path::new("."))
			.to_path_buf()
	});

	info!(config = %args.config.display(), "Loading config");
	let config = Config::load(&args.config)?;

	std::fs::create_dir_all(&output_dir)
		.with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;

	let locations = &config.probe.locations;
	let start_time = config.run.start_time;
	let (mut heights, heights_path) =
		ReportWriter::create(&output_dir, Table::Heights, start_time, locations)?;
	let (mut positions, positions_path) =
		ReportWriter::create(&output_dir, Table::Positions, start_time, locations)?;

	let fragment = config.scenario.fragment();
	let gravity = config.scenario.gravity();
	let times = config.run.step_times();

	println!(
		"Probing {} locations over {} steps with {} workers",
		locations.len(),
		times.len(),
		config.run.workers
	);

	for time in times {
		let workers = config.scenario.workers_at(&fragment, &config.run, time);
		let (reports, stats) = evaluate_step_timed(&config.probe, gravity, &workers)
			.with_context(|| format!("Reporting step failed at t = {time}"))?;

		debug!(time, samples = stats.sample_count, total_us = stats.total_us, "Step evaluated");
		if stats.not_found > 0 {
			warn!(time, not_found = stats.not_found, "Probe rays found no samples");
		}

		heights
			.write_step(time, &reports)
			.with_context(|| format!("Failed to write: {}", heights_path.display()))?;
		positions
			.write_step(time, &reports)
			.with_context(|| format!("Failed to write: {}", positions_path.display()))?;

		if let Some(first) = reports.first() {
			info!(time, height = first.height_above_boundary, "Step written");
		}
	}

	heights
		.finish()
		.with_context(|| format!("Failed to flush: {}", heights_path.display()))?;
	positions
		.finish()
		.with_context(|| format!("Failed to flush: {}", positions_path.display()))?;

	println!("Done! Output written to: {}", output_dir.display());

	Ok(())
}
