//! Greedy single-battery dispatch over a fixed demand profile.

use tracing::{debug, trace};

use crate::devices::BatteryConfig;
use crate::error::SimError;

use super::power_balance::net_demand_kw;
use super::types::{SimulationResult, StepOutcome};

/// Runs the greedy battery policy over `demand`.
///
/// Convenience wrapper around [`BatterySimulator::new`] and
/// [`BatterySimulator::simulate`].
///
/// # Errors
///
/// Returns [`SimError::InvalidConfig`] if `config` is invalid, or
/// [`SimError::InvalidDemand`] if a demand value is not finite.
///
/// # Examples
///
/// ```
/// use battery_sim::devices::BatteryConfig;
/// use battery_sim::sim::simulate;
///
/// let cfg = BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 5.0).unwrap();
/// let result = simulate(&[0.0, 0.0], &cfg).unwrap();
/// assert_eq!(result.battery_power, vec![0.0, 0.0]);
/// assert_eq!(result.state_of_charge, vec![5.0, 5.0]);
/// ```
pub fn simulate(demand: &[f64], config: &BatteryConfig) -> Result<SimulationResult, SimError> {
    BatterySimulator::new(config.clone())?.simulate(demand)
}

/// Myopic battery controller.
///
/// Each period it serves as much positive demand, or absorbs as much surplus,
/// as the power limit and the energy left between the SoC bounds allow. It
/// never looks ahead, so period `t` depends only on the SoC after `t - 1`.
#[derive(Debug, Clone)]
pub struct BatterySimulator {
    config: BatteryConfig,
}

impl BatterySimulator {
    /// Creates a simulator for a validated battery.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if any battery parameter is out of bounds.
    pub fn new(config: BatteryConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BatteryConfig {
        &self.config
    }

    /// Computes the battery action for a single period.
    ///
    /// # Arguments
    ///
    /// * `t` - Period index (selects the degraded efficiency)
    /// * `previous_soc` - State of charge entering the period (kWh)
    /// * `demand` - Demand for the period (kW; positive=load, negative=surplus)
    pub fn step(&self, t: usize, previous_soc: f64, demand: f64) -> StepOutcome {
        let cfg = &self.config;
        let efficiency = cfg.efficiency_at(t);

        let battery_power = if demand > 0.0 {
            -cfg.max_discharge_power(previous_soc, efficiency).min(demand)
        } else if demand < 0.0 {
            cfg.max_charge_power(previous_soc, efficiency).min(-demand)
        } else {
            0.0
        };

        let state_of_charge =
            cfg.clamp_soc(previous_soc + cfg.stored_energy(battery_power, efficiency));

        StepOutcome {
            battery_power,
            state_of_charge,
            net_demand: net_demand_kw(demand, battery_power),
        }
    }

    /// Runs the policy over the whole demand profile in one forward pass.
    ///
    /// An empty profile yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDemand`] for the first non-finite demand value;
    /// no partial result is returned.
    pub fn simulate(&self, demand: &[f64]) -> Result<SimulationResult, SimError> {
        if let Some(timestep) = demand.iter().position(|d| !d.is_finite()) {
            return Err(SimError::InvalidDemand { timestep });
        }

        let mut result = SimulationResult::with_capacity(self.config.initial_soc, demand);
        let mut soc = self.config.initial_soc;

        for (t, &d) in demand.iter().enumerate() {
            let outcome = self.step(t, soc, d);
            trace!(
                timestep = t,
                demand = d,
                battery_power = outcome.battery_power,
                soc = outcome.state_of_charge,
                "battery step"
            );
            soc = outcome.state_of_charge;
            result.push(outcome);
        }

        debug!(steps = result.len(), final_soc = soc, "simulation complete");
        Ok(result)
    }
}
