//! Error taxonomy for the simulator core.

use thiserror::Error;

/// Errors raised before or during a simulation run.
///
/// Both variants are fatal to the run: no partial result is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A battery or sizing parameter violates its bounds.
    #[error("invalid config: {field}: {message}")]
    InvalidConfig {
        /// Parameter name (e.g., `"max_soc"`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },

    /// A demand value is NaN or infinite.
    #[error("invalid demand at timestep {timestep}: value must be finite")]
    InvalidDemand { timestep: usize },
}

impl SimError {
    pub(crate) fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
