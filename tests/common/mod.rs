//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use battery_sim::config::TUTORIAL_DEMAND_KW;
use battery_sim::devices::BatteryConfig;

/// Tolerance for floating-point comparisons.
pub const EPS: f64 = 1e-9;

/// Course battery (10/1 kWh bounds, 15 kW, 98% efficiency, 1 h steps, 5 kWh start).
pub fn tutorial_battery() -> BatteryConfig {
    BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 5.0).expect("tutorial battery is valid")
}

/// Course demand profile (ten one-hour periods).
pub fn tutorial_demand() -> Vec<f64> {
    TUTORIAL_DEMAND_KW.to_vec()
}

/// Asserts `actual` is within [`EPS`] of `expected`.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}
