use serde::Serialize;

use crate::error::SimError;

/// Roof pitch assumed when none is given (degrees from horizontal).
pub const DEFAULT_ROOF_ANGLE_DEG: f64 = 22.0;

/// Outcome of fitting panels onto a roof.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PvSizing {
    /// Installed peak power in watts.
    pub total_power_w: f64,
    /// Number of whole panels that fit.
    pub panel_count: u64,
}

/// Sizes a rooftop PV array from building and panel dimensions.
///
/// Panels are laid in a grid with their height along the building length and
/// their width up the roof slope. The slope length is the building width
/// divided by `cos(roof_angle)`; only whole panels are counted.
///
/// # Arguments
///
/// * `building_length_m` - Building length in metres
/// * `building_width_m` - Building width (horizontal projection) in metres
/// * `panel_width_mm` - Panel width in millimetres
/// * `panel_height_mm` - Panel height in millimetres
/// * `panel_power_w` - Rated power of one panel in watts
/// * `roof_angle_deg` - Roof pitch in degrees, usually [`DEFAULT_ROOF_ANGLE_DEG`]
///
/// # Errors
///
/// Returns [`SimError::InvalidConfig`] for negative or non-finite dimensions,
/// non-positive panel sizes, or a pitch outside `[0, 90)`.
///
/// # Examples
///
/// ```
/// use battery_sim::devices::solar::{calculate_pv_size, DEFAULT_ROOF_ANGLE_DEG};
///
/// let sizing = calculate_pv_size(30.0, 8.0, 1046.0, 1690.0, 400.0, DEFAULT_ROOF_ANGLE_DEG).unwrap();
/// assert_eq!(sizing.panel_count, 136);
/// assert_eq!(sizing.total_power_w, 54_400.0);
/// ```
pub fn calculate_pv_size(
    building_length_m: f64,
    building_width_m: f64,
    panel_width_mm: f64,
    panel_height_mm: f64,
    panel_power_w: f64,
    roof_angle_deg: f64,
) -> Result<PvSizing, SimError> {
    let non_negative = [
        ("building_length", building_length_m),
        ("building_width", building_width_m),
        ("panel_power", panel_power_w),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(SimError::invalid_config(field, "must be finite and >= 0"));
        }
    }
    for (field, value) in [("panel_width", panel_width_mm), ("panel_height", panel_height_mm)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(SimError::invalid_config(field, "must be finite and > 0"));
        }
    }
    if !(0.0..90.0).contains(&roof_angle_deg) {
        return Err(SimError::invalid_config("roof_angle", "must be in [0, 90)"));
    }

    let panel_width_m = panel_width_mm * 1e-3;
    let panel_height_m = panel_height_mm * 1e-3;

    let sloped_width_m = building_width_m / roof_angle_deg.to_radians().cos();
    let along_length = (building_length_m / panel_height_m).floor();
    let along_width = (sloped_width_m / panel_width_m).floor();
    let panel_count = (along_length * along_width) as u64;

    Ok(PvSizing {
        total_power_w: panel_power_w * panel_count as f64,
        panel_count,
    })
}

/// A PV array whose output follows a capacity-factor profile.
///
/// # Power Flow Convention
/// Output is reported as a **positive** generation in kW; callers subtract it
/// from load (see [`crate::sim::power_balance::site_demand_kw`]).
#[derive(Debug, Clone, PartialEq)]
pub struct PvArray {
    /// Identifier shown in reports.
    pub id: String,
    /// Per-step output per kW of peak power (kW/kWp).
    pub capacity_factor: Vec<f64>,
    /// Peak power in kilowatts.
    pub peak_power_kw: f64,
}

impl PvArray {
    /// Creates a PV array. Negative peak power is clamped to zero.
    pub fn new(id: impl Into<String>, capacity_factor: Vec<f64>, peak_power_kw: f64) -> Self {
        Self {
            id: id.into(),
            capacity_factor,
            peak_power_kw: peak_power_kw.max(0.0),
        }
    }

    /// Number of periods in the profile.
    pub fn len(&self) -> usize {
        self.capacity_factor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacity_factor.is_empty()
    }

    /// Generation profile in kW.
    pub fn output_kw(&self) -> Vec<f64> {
        self.capacity_factor
            .iter()
            .map(|cf| cf * self.peak_power_kw)
            .collect()
    }
}
