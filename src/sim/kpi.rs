//! Post-hoc KPI computation from a simulation result.

use std::fmt;

use serde::Serialize;

use crate::devices::BatteryConfig;

use super::types::SimulationResult;

/// Aggregate indicators derived from a complete simulation run.
///
/// Computed post-hoc from a [`SimulationResult`] so reported metrics always
/// agree with the step data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// Highest positive demand before the battery (kW).
    pub peak_demand_kw: f64,
    /// Highest positive net demand after the battery (kW).
    pub peak_net_demand_kw: f64,
    /// `peak_demand_kw - peak_net_demand_kw`.
    pub peak_reduction_kw: f64,
    /// Energy drawn while charging (kWh).
    pub energy_charged_kwh: f64,
    /// Energy delivered while discharging (kWh).
    pub energy_discharged_kwh: f64,
    /// Sum of `|power| * dt` (kWh).
    pub throughput_kwh: f64,
    /// Throughput over twice the usable capacity.
    pub equivalent_full_cycles: f64,
    /// Positive net demand left unserved (kWh).
    pub unserved_energy_kwh: f64,
    /// Surplus the battery could not absorb (kWh, positive magnitude).
    pub unabsorbed_surplus_kwh: f64,
    /// State of charge after the last period (kWh).
    pub final_soc_kwh: f64,
}

impl KpiReport {
    /// Computes all KPIs from a simulation result.
    ///
    /// # Arguments
    ///
    /// * `result` - Complete simulation result
    /// * `config` - Battery used for the run (time step and capacity)
    pub fn from_result(result: &SimulationResult, config: &BatteryConfig) -> Self {
        let dt = config.time_step;

        let mut peak_demand = 0.0_f64;
        let mut peak_net = 0.0_f64;
        let mut charged = 0.0_f64;
        let mut discharged = 0.0_f64;
        let mut unserved = 0.0_f64;
        let mut unabsorbed = 0.0_f64;

        for step in result.steps() {
            peak_demand = peak_demand.max(step.demand);
            peak_net = peak_net.max(step.net_demand);

            if step.battery_power > 0.0 {
                charged += step.battery_power * dt;
            } else {
                discharged += -step.battery_power * dt;
            }

            if step.net_demand > 0.0 {
                unserved += step.net_demand * dt;
            } else {
                unabsorbed += -step.net_demand * dt;
            }
        }

        let throughput = charged + discharged;
        let capacity = config.usable_capacity();
        let cycles = if capacity > 0.0 {
            throughput / (2.0 * capacity)
        } else {
            0.0
        };

        Self {
            peak_demand_kw: peak_demand,
            peak_net_demand_kw: peak_net,
            peak_reduction_kw: peak_demand - peak_net,
            energy_charged_kwh: charged,
            energy_discharged_kwh: discharged,
            throughput_kwh: throughput,
            equivalent_full_cycles: cycles,
            unserved_energy_kwh: unserved,
            unabsorbed_surplus_kwh: unabsorbed,
            final_soc_kwh: result.final_soc(),
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(
            f,
            "Peak demand:           {:.2} kW -> {:.2} kW (reduced {:.2} kW)",
            self.peak_demand_kw, self.peak_net_demand_kw, self.peak_reduction_kw
        )?;
        writeln!(f, "Energy charged:        {:.2} kWh", self.energy_charged_kwh)?;
        writeln!(f, "Energy discharged:     {:.2} kWh", self.energy_discharged_kwh)?;
        writeln!(
            f,
            "Battery throughput:    {:.2} kWh ({:.2} equiv. cycles)",
            self.throughput_kwh, self.equivalent_full_cycles
        )?;
        writeln!(f, "Unserved demand:       {:.2} kWh", self.unserved_energy_kwh)?;
        writeln!(f, "Unabsorbed surplus:    {:.2} kWh", self.unabsorbed_surplus_kwh)?;
        write!(f, "Final state of charge: {:.2} kWh", self.final_soc_kwh)
    }
}
