//! Seeded property sweeps over random batteries and demand profiles.

use battery_sim::devices::{BatteryConfig, EfficiencyModel};
use battery_sim::sim::{BatterySimulator, simulate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 200;

fn random_config(rng: &mut StdRng) -> BatteryConfig {
    let min_soc = rng.random_range(0.0..5.0);
    let max_soc = min_soc + rng.random_range(0.5..20.0);
    let max_power = rng.random_range(0.1..20.0);
    let efficiency = rng.random_range(0.5..=1.0);
    let time_step = rng.random_range(0.25..2.0);
    let initial_soc = rng.random_range(min_soc..=max_soc);
    let model = if rng.random_bool(0.5) {
        EfficiencyModel::Derate
    } else {
        EfficiencyModel::LossAware
    };
    let degradation = if rng.random_bool(0.5) {
        0.0
    } else {
        rng.random_range(0.0..0.05)
    };
    BatteryConfig::new(max_soc, min_soc, max_power, efficiency, time_step, initial_soc)
        .expect("random config is valid")
        .with_efficiency_model(model)
        .with_degradation(degradation)
        .expect("random degradation is valid")
}

fn random_demand(rng: &mut StdRng) -> Vec<f64> {
    let len = rng.random_range(1..48);
    (0..len)
        .map(|_| {
            if rng.random_bool(0.1) {
                0.0
            } else {
                rng.random_range(-25.0..25.0)
            }
        })
        .collect()
}

#[test]
fn soc_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..CASES {
        let cfg = random_config(&mut rng);
        let demand = random_demand(&mut rng);
        let result = simulate(&demand, &cfg).expect("run should succeed");
        for &soc in &result.state_of_charge {
            assert!(
                (cfg.min_soc..=cfg.max_soc).contains(&soc),
                "soc {soc} outside [{}, {}] for {cfg:?}",
                cfg.min_soc,
                cfg.max_soc
            );
        }
    }
}

#[test]
fn soc_follows_energy_update_without_clamping() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..CASES {
        let cfg = random_config(&mut rng);
        let demand = random_demand(&mut rng);
        let result = simulate(&demand, &cfg).expect("run should succeed");
        let mut previous = cfg.initial_soc;
        for t in 0..result.len() {
            let power = result.battery_power[t];
            let unclamped = previous + cfg.stored_energy(power, cfg.efficiency_at(t));
            assert!(
                (result.state_of_charge[t] - unclamped).abs() < 1e-9,
                "step {t}: soc {} but update gives {unclamped} for {cfg:?}",
                result.state_of_charge[t]
            );
            assert!(
                unclamped >= cfg.min_soc - 1e-9 && unclamped <= cfg.max_soc + 1e-9,
                "step {t}: update {unclamped} leaves [{}, {}] for {cfg:?}",
                cfg.min_soc,
                cfg.max_soc
            );
            previous = result.state_of_charge[t];
        }
    }
}

#[test]
fn net_demand_is_demand_plus_battery() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..CASES {
        let cfg = random_config(&mut rng);
        let demand = random_demand(&mut rng);
        let result = simulate(&demand, &cfg).expect("run should succeed");
        for t in 0..result.len() {
            assert_eq!(result.net_demand[t], demand[t] + result.battery_power[t]);
        }
    }
}

#[test]
fn zero_demand_keeps_soc() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..CASES {
        let cfg = random_config(&mut rng);
        let demand = random_demand(&mut rng);
        let result = simulate(&demand, &cfg).expect("run should succeed");
        for t in 0..result.len() {
            if demand[t] == 0.0 {
                let previous = if t == 0 {
                    cfg.initial_soc
                } else {
                    result.state_of_charge[t - 1]
                };
                assert_eq!(result.battery_power[t], 0.0);
                assert_eq!(result.state_of_charge[t], previous);
            }
        }
    }
}

#[test]
fn battery_never_overshoots_demand() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..CASES {
        let cfg = random_config(&mut rng);
        let demand = random_demand(&mut rng);
        let result = simulate(&demand, &cfg).expect("run should succeed");
        for t in 0..result.len() {
            let power = result.battery_power[t];
            assert!(power.abs() <= demand[t].abs());
            assert!(power.abs() <= cfg.max_power);
            if demand[t] > 0.0 {
                assert!(power <= 0.0);
            } else if demand[t] < 0.0 {
                assert!(power >= 0.0);
            }
        }
    }
}

#[test]
fn raising_power_limit_never_shrinks_action() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..CASES {
        let low = random_config(&mut rng);
        let mut high = low.clone();
        high.max_power = low.max_power * rng.random_range(1.0..4.0);

        let low_sim = BatterySimulator::new(low.clone()).expect("valid config");
        let high_sim = BatterySimulator::new(high).expect("valid config");

        let soc = rng.random_range(low.min_soc..=low.max_soc);
        let demand = rng.random_range(-25.0..25.0);
        let a = low_sim.step(0, soc, demand).battery_power.abs();
        let b = high_sim.step(0, soc, demand).battery_power.abs();
        assert!(b >= a, "power {b} < {a} after raising the limit");
    }
}

#[test]
fn simulate_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..CASES {
        let cfg = random_config(&mut rng);
        let demand = random_demand(&mut rng);
        let a = simulate(&demand, &cfg).expect("run should succeed");
        let b = simulate(&demand, &cfg).expect("run should succeed");
        assert_eq!(a, b);
    }
}
