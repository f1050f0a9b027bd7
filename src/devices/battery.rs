use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// How round-trip efficiency enters the battery model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyModel {
    /// Efficiency derates the charge and discharge power limits only.
    /// The state of charge moves by exactly `power * time_step`.
    #[default]
    Derate,
    /// Efficiency is applied to energy flows: charging stores
    /// `power * efficiency * time_step`, discharging removes
    /// `power * time_step / efficiency`.
    LossAware,
}

/// Parameters of a single stationary battery.
///
/// Energies are in kWh, powers in kW and the time step in hours. A config is
/// created once per simulation and never mutated by it.
///
/// # Power Flow Convention
/// - Positive power: charging (absorbing surplus)
/// - Negative power: discharging (serving demand)
///
/// # Examples
///
/// ```
/// use battery_sim::devices::BatteryConfig;
///
/// let cfg = BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 5.0).unwrap();
/// assert_eq!(cfg.usable_capacity(), 9.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryConfig {
    /// Upper bound on stored energy (kWh).
    pub max_soc: f64,
    /// Lower bound on stored energy (kWh).
    pub min_soc: f64,
    /// Maximum charge/discharge power magnitude (kW).
    pub max_power: f64,
    /// Round-trip efficiency (0..=1.0).
    pub efficiency: f64,
    /// Duration of one period in hours.
    pub time_step: f64,
    /// Stored energy before the first period (kWh).
    pub initial_soc: f64,
    pub efficiency_model: EfficiencyModel,
    /// Fractional efficiency fade applied per period (0 disables fade).
    pub degradation_per_step: f64,
}

impl BatteryConfig {
    /// Creates a validated battery configuration using the [`EfficiencyModel::Derate`]
    /// model and no degradation.
    ///
    /// # Arguments
    ///
    /// * `max_soc` - Maximum state of charge in kWh (must be > `min_soc`)
    /// * `min_soc` - Minimum state of charge in kWh (must be >= 0)
    /// * `max_power` - Charge/discharge power limit in kW (must be > 0)
    /// * `efficiency` - Round-trip efficiency (0 < efficiency <= 1)
    /// * `time_step` - Period length in hours (must be > 0)
    /// * `initial_soc` - Starting state of charge in kWh, within the bounds
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first violated bound.
    pub fn new(
        max_soc: f64,
        min_soc: f64,
        max_power: f64,
        efficiency: f64,
        time_step: f64,
        initial_soc: f64,
    ) -> Result<Self, SimError> {
        let cfg = Self {
            max_soc,
            min_soc,
            max_power,
            efficiency,
            time_step,
            initial_soc,
            efficiency_model: EfficiencyModel::default(),
            degradation_per_step: 0.0,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Returns a copy using the given efficiency model.
    pub fn with_efficiency_model(mut self, model: EfficiencyModel) -> Self {
        self.efficiency_model = model;
        self
    }

    /// Returns a copy with per-step efficiency fade.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `degradation` is outside `[0, 1)`.
    pub fn with_degradation(mut self, degradation: f64) -> Result<Self, SimError> {
        self.degradation_per_step = degradation;
        self.validate()?;
        Ok(self)
    }

    /// Checks every parameter bound.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for the first violated bound.
    pub fn validate(&self) -> Result<(), SimError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns one [`SimError::InvalidConfig`] per violated bound, in field order.
    ///
    /// A non-finite field is reported once as non-finite; bounds that depend
    /// on it are skipped.
    pub fn violations(&self) -> Vec<SimError> {
        let mut errors = Vec::new();
        let fields = [
            ("max_soc", self.max_soc),
            ("min_soc", self.min_soc),
            ("max_power", self.max_power),
            ("efficiency", self.efficiency),
            ("time_step", self.time_step),
            ("initial_soc", self.initial_soc),
            ("degradation_per_step", self.degradation_per_step),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                errors.push(SimError::invalid_config(field, "must be finite"));
            }
        }

        let soc_bounds_finite = self.min_soc.is_finite() && self.max_soc.is_finite();
        if self.min_soc < 0.0 {
            errors.push(SimError::invalid_config("min_soc", "must be >= 0"));
        }
        if soc_bounds_finite && self.max_soc <= self.min_soc {
            errors.push(SimError::invalid_config("max_soc", "must be > min_soc"));
        }
        if self.max_power <= 0.0 {
            errors.push(SimError::invalid_config("max_power", "must be > 0"));
        }
        if self.efficiency <= 0.0 || self.efficiency > 1.0 {
            errors.push(SimError::invalid_config("efficiency", "must be in (0.0, 1.0]"));
        }
        if self.time_step <= 0.0 {
            errors.push(SimError::invalid_config("time_step", "must be > 0"));
        }
        if soc_bounds_finite
            && self.initial_soc.is_finite()
            && !(self.min_soc..=self.max_soc).contains(&self.initial_soc)
        {
            errors.push(SimError::invalid_config(
                "initial_soc",
                format!("must be in [{}, {}]", self.min_soc, self.max_soc),
            ));
        }
        if self.degradation_per_step.is_finite()
            && !(0.0..1.0).contains(&self.degradation_per_step)
        {
            errors.push(SimError::invalid_config(
                "degradation_per_step",
                "must be in [0.0, 1.0)",
            ));
        }
        errors
    }

    /// Energy between the two SoC bounds (kWh).
    pub fn usable_capacity(&self) -> f64 {
        self.max_soc - self.min_soc
    }

    /// Efficiency in effect at period `t` after degradation.
    pub fn efficiency_at(&self, t: usize) -> f64 {
        if self.degradation_per_step == 0.0 {
            return self.efficiency;
        }
        self.efficiency * (1.0 - self.degradation_per_step).powf(t as f64)
    }

    /// Largest discharge power magnitude available from `previous_soc`.
    pub fn max_discharge_power(&self, previous_soc: f64, efficiency: f64) -> f64 {
        let available_energy = (previous_soc - self.min_soc).max(0.0);
        self.max_power
            .min(available_energy * efficiency / self.time_step)
    }

    /// Largest charge power that fits in the headroom above `previous_soc`.
    pub fn max_charge_power(&self, previous_soc: f64, efficiency: f64) -> f64 {
        let headroom = (self.max_soc - previous_soc).max(0.0);
        let energy_limited = match self.efficiency_model {
            EfficiencyModel::Derate => headroom * efficiency / self.time_step,
            EfficiencyModel::LossAware => headroom / efficiency / self.time_step,
        };
        self.max_power.min(energy_limited)
    }

    /// Change in stored energy (kWh) for `power` held over one period.
    pub fn stored_energy(&self, power: f64, efficiency: f64) -> f64 {
        match self.efficiency_model {
            EfficiencyModel::Derate => power * self.time_step,
            EfficiencyModel::LossAware if power >= 0.0 => power * efficiency * self.time_step,
            EfficiencyModel::LossAware => power * self.time_step / efficiency,
        }
    }

    /// Clamps a state of charge into `[min_soc, max_soc]`.
    pub fn clamp_soc(&self, soc: f64) -> f64 {
        soc.clamp(self.min_soc, self.max_soc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tutorial() -> BatteryConfig {
        BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 5.0).expect("valid config")
    }

    fn field_of(err: SimError) -> &'static str {
        match err {
            SimError::InvalidConfig { field, .. } => field,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_new_battery_config() {
        let cfg = tutorial();
        assert_eq!(cfg.max_soc, 10.0);
        assert_eq!(cfg.min_soc, 1.0);
        assert_eq!(cfg.max_power, 15.0);
        assert_eq!(cfg.efficiency, 0.98);
        assert_eq!(cfg.efficiency_model, EfficiencyModel::Derate);
        assert_eq!(cfg.degradation_per_step, 0.0);
    }

    #[test]
    fn test_bounds_rejected() {
        let cases = [
            (BatteryConfig::new(1.0, 1.0, 15.0, 0.98, 1.0, 1.0), "max_soc"),
            (BatteryConfig::new(10.0, -1.0, 15.0, 0.98, 1.0, 5.0), "min_soc"),
            (BatteryConfig::new(10.0, 1.0, 0.0, 0.98, 1.0, 5.0), "max_power"),
            (BatteryConfig::new(10.0, 1.0, 15.0, 0.0, 1.0, 5.0), "efficiency"),
            (BatteryConfig::new(10.0, 1.0, 15.0, 1.1, 1.0, 5.0), "efficiency"),
            (BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 0.0, 5.0), "time_step"),
            (BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 0.5), "initial_soc"),
            (BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 10.5), "initial_soc"),
            (BatteryConfig::new(f64::NAN, 1.0, 15.0, 0.98, 1.0, 5.0), "max_soc"),
        ];
        for (result, field) in cases {
            let err = result.expect_err("config should be rejected");
            assert_eq!(field_of(err), field);
        }
    }

    #[test]
    fn test_violations_lists_every_bad_field() {
        let mut cfg = tutorial();
        cfg.max_power = 0.0;
        cfg.efficiency = 2.0;
        cfg.time_step = -1.0;
        let fields: Vec<_> = cfg.violations().into_iter().map(field_of).collect();
        assert_eq!(fields, vec!["max_power", "efficiency", "time_step"]);
        assert_eq!(cfg.validate().map_err(field_of), Err("max_power"));
    }

    #[test]
    fn test_non_finite_field_reported_once() {
        let mut cfg = tutorial();
        cfg.max_soc = f64::NAN;
        let fields: Vec<_> = cfg.violations().into_iter().map(field_of).collect();
        assert_eq!(fields, vec!["max_soc"]);
        assert!(tutorial().violations().is_empty());
    }

    #[test]
    fn test_initial_soc_on_bounds_is_valid() {
        assert!(BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 1.0).is_ok());
        assert!(BatteryConfig::new(10.0, 1.0, 15.0, 0.98, 1.0, 10.0).is_ok());
    }

    #[test]
    fn test_degradation_bounds() {
        assert!(tutorial().with_degradation(0.01).is_ok());
        let err = tutorial().with_degradation(1.0).expect_err("fade of 1.0 rejected");
        assert_eq!(field_of(err), "degradation_per_step");
    }

    #[test]
    fn test_discharge_limited_by_energy() {
        let cfg = tutorial();
        // 4 kWh above min_soc, derated by 0.98 over 1h
        assert!((cfg.max_discharge_power(5.0, 0.98) - 3.92).abs() < 1e-12);
    }

    #[test]
    fn test_discharge_limited_by_power() {
        let cfg = BatteryConfig::new(100.0, 0.0, 2.0, 1.0, 1.0, 50.0).expect("valid config");
        assert_eq!(cfg.max_discharge_power(50.0, 1.0), 2.0);
    }

    #[test]
    fn test_charge_limit_per_model() {
        let derate = tutorial();
        assert!((derate.max_charge_power(5.0, 0.98) - 4.9).abs() < 1e-12);

        let lossy = tutorial().with_efficiency_model(EfficiencyModel::LossAware);
        assert!((lossy.max_charge_power(5.0, 0.98) - 5.0 / 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_limits_are_zero_at_bounds() {
        let cfg = tutorial();
        assert_eq!(cfg.max_discharge_power(cfg.min_soc, 0.98), 0.0);
        assert_eq!(cfg.max_charge_power(cfg.max_soc, 0.98), 0.0);
    }

    #[test]
    fn test_stored_energy_loss_aware() {
        let cfg = tutorial().with_efficiency_model(EfficiencyModel::LossAware);
        assert!((cfg.stored_energy(1.0, 0.9) - 0.9).abs() < 1e-12);
        assert!((cfg.stored_energy(-0.9, 0.9) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_efficiency_fades_with_degradation() {
        let cfg = tutorial().with_degradation(0.01).expect("valid fade");
        assert_eq!(cfg.efficiency_at(0), 0.98);
        assert!((cfg.efficiency_at(2) - 0.98 * 0.99 * 0.99).abs() < 1e-12);
        assert_eq!(tutorial().efficiency_at(100), 0.98);
    }
}
