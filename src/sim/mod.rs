pub mod kpi;
/// Net-demand arithmetic shared by the simulator and scenario builder.
pub mod power_balance;
/// Greedy battery dispatch.
pub mod simulator;
pub mod types;

pub use simulator::{BatterySimulator, simulate};
pub use types::{SimulationResult, StepOutcome, StepRecord};
