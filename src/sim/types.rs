//! Core simulation types: per-step outcomes and the complete run result.

use std::fmt;

use serde::Serialize;

/// Battery action and resulting state for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Battery power (kW; positive=charge, negative=discharge).
    pub battery_power: f64,
    /// Stored energy after the period (kWh).
    pub state_of_charge: f64,
    /// Demand left after the battery's contribution (kW).
    pub net_demand: f64,
}

/// Output of one simulation run.
///
/// Vectors are index-aligned: entry `t` of every vector describes period `t`.
/// Populated once by a single forward pass and not mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// State of charge before the first period (kWh).
    pub initial_soc: f64,
    /// Input demand (kW; positive=load, negative=surplus).
    pub demand: Vec<f64>,
    /// Battery power per period (kW; positive=charge, negative=discharge).
    pub battery_power: Vec<f64>,
    /// State of charge at the end of each period (kWh).
    pub state_of_charge: Vec<f64>,
    /// `demand[t] + battery_power[t]` (kW).
    pub net_demand: Vec<f64>,
}

impl SimulationResult {
    pub(crate) fn with_capacity(initial_soc: f64, demand: &[f64]) -> Self {
        let n = demand.len();
        Self {
            initial_soc,
            demand: demand.to_vec(),
            battery_power: Vec::with_capacity(n),
            state_of_charge: Vec::with_capacity(n),
            net_demand: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, outcome: StepOutcome) {
        self.battery_power.push(outcome.battery_power);
        self.state_of_charge.push(outcome.state_of_charge);
        self.net_demand.push(outcome.net_demand);
    }

    /// Number of simulated periods.
    pub fn len(&self) -> usize {
        self.battery_power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battery_power.is_empty()
    }

    /// State of charge after the last period, or the initial SoC for an empty run.
    pub fn final_soc(&self) -> f64 {
        self.state_of_charge
            .last()
            .copied()
            .unwrap_or(self.initial_soc)
    }

    /// Iterates over per-period records.
    pub fn steps(&self) -> impl Iterator<Item = StepRecord> + '_ {
        (0..self.len()).map(move |t| StepRecord {
            timestep: t,
            demand: self.demand[t],
            battery_power: self.battery_power[t],
            state_of_charge: self.state_of_charge[t],
            net_demand: self.net_demand[t],
        })
    }
}

/// Flattened view of one period, used for display and export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub timestep: usize,
    pub demand: f64,
    pub battery_power: f64,
    pub state_of_charge: f64,
    pub net_demand: f64,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.battery_power > 0.0 {
            "charge"
        } else if self.battery_power < 0.0 {
            "discharge"
        } else {
            "idle"
        };
        write!(
            f,
            "t={:>3} | demand={:>7.3} kW  battery={:>7.3} kW ({action:<9}) | \
             SoC={:>6.3} kWh | net={:>7.3} kW",
            self.timestep, self.demand, self.battery_power, self.state_of_charge, self.net_demand,
        )
    }
}
