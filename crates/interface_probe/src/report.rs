//! Plain text report tables.
//!
//! Two tables per run, one row per reporting step:
//! - heights.dat: height above boundary and height above location per probe
//! - positions.dat: interface position per probe
//!
//! Values use scientific notation with 10 digits in 19-wide columns.

use anyhow::{Context, Result};
use glam::DVec3;
use interface_height::InterfaceReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column width for values.
const WIDTH: usize = 19;
/// Width of header property names.
const NAME_WIDTH: usize = 16;

/// Which quantity a table holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
	Heights,
	Positions,
}

impl Table {
	pub fn file_stem(self) -> &'static str {
		match self {
			Table::Heights => "heights",
			Table::Positions => "positions",
		}
	}
}

/// Output path for `table` inside `dir`.
///
/// Existing files are never overwritten. A taken `<stem>.dat` moves the run
/// to `<stem>_<start_time>.dat`, and when that is taken as well to
/// `<stem>_<start_time>_<n>.dat` with the first free `n`.
pub fn table_path(dir: &Path, table: Table, start_time: f64) -> PathBuf {
	let stem = table.file_stem();
	std::iter::once(format!("{stem}.dat"))
		.chain(std::iter::once(format!("{stem}_{start_time}.dat")))
		.chain((1..).map(|n| format!("{stem}_{start_time}_{n}.dat")))
		.map(|name| dir.join(name))
		.find(|path| !path.exists())
		.unwrap_or_else(|| dir.join(format!("{stem}.dat")))
}

/// Writes one table to an owned stream.
pub struct ReportWriter<W: Write> {
	table: Table,
	out: W,
}

impl ReportWriter<BufWriter<File>> {
	/// Create the table file in `dir` and write its header.
	pub fn create(dir: &Path, table: Table, start_time: f64, locations: &[DVec3]) -> Result<(Self, PathBuf)> {
		let path = table_path(dir, table, start_time);
		let file = File::options()
			.write(true)
			.create_new(true)
			.open(&path)
			.with_context(|| format!("Failed to create report file: {}", path.display()))?;
		let writer = Self::new(BufWriter::new(file), table, locations)
			.with_context(|| format!("Failed to write header: {}", path.display()))?;
		Ok((writer, path))
	}
}

impl<W: Write> ReportWriter<W> {
	/// Wrap `out` and write the table header.
	pub fn new(mut out: W, table: Table, locations: &[DVec3]) -> std::io::Result<Self> {
		for (i, location) in locations.iter().enumerate() {
			write_header_value(
				&mut out,
				&format!("Location {i}"),
				&format!("({} {} {})", location.x, location.y, location.z),
			)?;
		}
		match table {
			Table::Heights => {
				write_header_value(&mut out, "hB", "Interface height above the boundary")?;
				write_header_value(&mut out, "hL", "Interface height above the location")?;
			}
			Table::Positions => {
				write_header_value(&mut out, "p", "Interface position")?;
			}
		}

		write!(out, "{:<WIDTH$}", "# Time")?;
		for i in 0..locations.len() {
			match table {
				Table::Heights => write!(out, "{:>WIDTH$}{:>WIDTH$}", format!("hB {i}"), format!("hL {i}"))?,
				Table::Positions => write!(out, "  {:>WIDTH$}{:>WIDTH$}{:>WIDTH$} ", format!("p {i}"), "", "")?,
			}
		}
		writeln!(out)?;

		Ok(Self { table, out })
	}

	/// Append the row for one reporting step.
	pub fn write_step(&mut self, time: f64, reports: &[InterfaceReport]) -> std::io::Result<()> {
		write!(self.out, "{:<WIDTH$}", time)?;
		for report in reports {
			match self.table {
				Table::Heights => write!(
					self.out,
					"{:>WIDTH$.10e}{:>WIDTH$.10e}",
					report.height_above_boundary, report.height_above_location
				)?,
				Table::Positions => {
					let p = report.position;
					write!(self.out, "({:>WIDTH$.10e}{:>WIDTH$.10e}{:>WIDTH$.10e}) ", p.x, p.y, p.z)?
				}
			}
		}
		writeln!(self.out)
	}

	/// Flush and hand back the stream.
	pub fn finish(mut self) -> std::io::Result<W> {
		self.out.flush()?;
		Ok(self.out)
	}
}

fn write_header_value<W: Write>(out: &mut W, property: &str, value: &str) -> std::io::Result<()> {
	writeln!(out, "# {property:<NAME_WIDTH$} : {value}")
}
