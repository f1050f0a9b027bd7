//! Battery simulator entry point: CLI wiring and scenario-driven runs.

use std::process;

use anyhow::{Context, Result, bail};
use tracing::{Level, info};

use battery_sim::cli::{self, Command, SimulateOptions, SizePvOptions};
use battery_sim::config::ScenarioConfig;
use battery_sim::devices::calculate_pv_size;
use battery_sim::io::export::{export_csv, export_json};
use battery_sim::sim::BatterySimulator;
use battery_sim::sim::kpi::KpiReport;

fn load_scenario(opts: &SimulateOptions) -> Result<ScenarioConfig> {
    // --scenario takes priority, then --preset; the parser fills in the default preset
    let scenario = if let Some(path) = &opts.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else {
        ScenarioConfig::from_preset(opts.preset.as_deref().unwrap_or("tutorial"))?
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }
    Ok(scenario)
}

fn run_simulation(opts: &SimulateOptions) -> Result<()> {
    let scenario = load_scenario(opts)?;
    let battery = scenario.battery_config()?;
    let demand = scenario.demand_profile()?;

    info!(
        battery = %scenario.battery.name,
        steps = demand.len(),
        model = ?battery.efficiency_model,
        "running simulation"
    );

    let simulator = BatterySimulator::new(battery)?;
    let result = simulator.simulate(&demand)?;
    let kpi = KpiReport::from_result(&result, simulator.config());

    for step in result.steps() {
        println!("{step}");
    }
    println!("\nThe final state of charge is: {:.3} kWh", result.final_soc());
    println!("The net demand: {:?}", result.net_demand);
    println!("\n{kpi}");

    let time_step = simulator.config().time_step;
    if let Some(path) = &opts.telemetry_out {
        export_csv(&result, time_step, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), "telemetry written");
    }
    if let Some(path) = &opts.json_out {
        export_json(&result, &kpi, path)
            .with_context(|| format!("failed to write JSON to {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }
    Ok(())
}

fn run_size_pv(opts: &SizePvOptions) -> Result<()> {
    let sizing = calculate_pv_size(
        opts.length_m,
        opts.width_m,
        opts.panel_width_mm,
        opts.panel_height_mm,
        opts.panel_power_w,
        opts.roof_angle_deg,
    )?;
    println!(
        "The capacity of the house is {} Wp, with {} panels",
        sizing.total_power_w, sizing.panel_count
    );
    Ok(())
}

fn main() {
    let command = match cli::parse_args() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let verbose = matches!(&command, Command::Simulate(opts) if opts.verbose);
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let outcome = match &command {
        Command::Simulate(opts) => run_simulation(opts),
        Command::SizePv(opts) => run_size_pv(opts),
    };

    if let Err(e) = outcome {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
