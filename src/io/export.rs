//! CSV and JSON export for simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::kpi::KpiReport;
use crate::sim::types::SimulationResult;

/// Column header for CSV result export.
const HEADER: &str = "timestep,time_hr,demand_kw,battery_kw,soc_kwh,net_demand_kw";

/// Exports a simulation result to a CSV file at the given path.
///
/// # Arguments
///
/// * `result` - Complete simulation result
/// * `time_step` - Period length in hours, used for the `time_hr` column
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &SimulationResult, time_step: f64, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, time_step, buf)
}

/// Writes a simulation result as CSV to any writer.
///
/// Writes a header row followed by one data row per period. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &SimulationResult, time_step: f64, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for s in result.steps() {
        wtr.write_record(&[
            s.timestep.to_string(),
            format!("{:.2}", s.timestep as f64 * time_step),
            format!("{:.4}", s.demand),
            format!("{:.4}", s.battery_power),
            format!("{:.4}", s.state_of_charge),
            format!("{:.4}", s.net_demand),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    result: &'a SimulationResult,
    kpi: &'a KpiReport,
}

/// Writes the result and its KPIs as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(result: &SimulationResult, kpi: &KpiReport, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, &JsonReport { result, kpi })?;
    writeln!(writer)?;
    writer.flush()
}

/// Exports the result and its KPIs to a JSON file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_json(result: &SimulationResult, kpi: &KpiReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_json(result, kpi, io::BufWriter::new(file))
}
