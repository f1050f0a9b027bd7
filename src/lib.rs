//! Single-battery dispatch simulator with rooftop PV sizing.

pub mod cli;
/// TOML scenario configuration and presets.
pub mod config;
pub mod devices;
pub mod error;
/// Demand profile input and result export.
pub mod io;
/// Simulation core, KPIs, and result types.
pub mod sim;
