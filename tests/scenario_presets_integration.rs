//! Integration tests for built-in presets and scenario files.

mod common;

use std::path::Path;

use battery_sim::config::ScenarioConfig;
use battery_sim::sim::kpi::KpiReport;
use battery_sim::sim::{SimulationResult, simulate};

fn run(cfg: &ScenarioConfig) -> SimulationResult {
    let battery = cfg.battery_config().expect("preset battery is valid");
    let demand = cfg.demand_profile().expect("preset demand resolves");
    simulate(&demand, &battery).expect("run should succeed")
}

#[test]
fn every_preset_runs_within_bounds() {
    for name in ScenarioConfig::PRESETS {
        let cfg = ScenarioConfig::from_preset(name).expect("preset exists");
        let battery = cfg.battery_config().expect("preset battery is valid");
        let result = run(&cfg);

        assert!(!result.is_empty(), "preset \"{name}\" should simulate periods");
        for &soc in &result.state_of_charge {
            assert!((battery.min_soc..=battery.max_soc).contains(&soc));
        }

        let kpi = KpiReport::from_result(&result, &battery);
        assert!(kpi.throughput_kwh.is_finite());
        assert!(kpi.unserved_energy_kwh >= 0.0);
    }
}

#[test]
fn solar_home_charges_at_noon_and_discharges_in_evening() {
    let result = run(&ScenarioConfig::solar_home());
    assert_eq!(result.len(), 24);
    assert!(result.battery_power[12] > 0.0, "midday PV surplus should charge");
    assert!(result.battery_power[18] < 0.0, "evening peak should discharge");
}

#[test]
fn lossy_preset_diverges_from_tutorial() {
    let tutorial = run(&ScenarioConfig::tutorial());
    let lossy = run(&ScenarioConfig::lossy());
    assert_eq!(tutorial.len(), lossy.len());
    assert_ne!(tutorial.state_of_charge, lossy.state_of_charge);
}

#[test]
fn shipped_scenario_file_matches_tutorial_preset() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/tutorial.toml");
    let cfg = ScenarioConfig::from_toml_file(&path).expect("scenario file loads");
    let errors = cfg.validate();
    assert!(errors.is_empty(), "scenario should be valid: {errors:?}");

    let from_file = run(&cfg);
    let from_preset = run(&ScenarioConfig::tutorial());
    assert_eq!(from_file, from_preset);
}

#[test]
fn shipped_csv_scenario_loads_demand() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/csv_demand.toml");
    let cfg = ScenarioConfig::from_toml_file(&path).expect("scenario file loads");
    assert!(cfg.validate().is_empty());
    assert_eq!(
        cfg.demand_profile().expect("csv demand resolves"),
        common::tutorial_demand()
    );
}
