//! Physical components: battery storage and rooftop PV.

/// Stationary battery parameters and limits.
pub mod battery;
/// Rooftop PV sizing and output profile.
pub mod solar;

// Re-export the main types for convenience
pub use battery::{BatteryConfig, EfficiencyModel};
pub use solar::{DEFAULT_ROOF_ANGLE_DEG, PvArray, PvSizing, calculate_pv_size};
