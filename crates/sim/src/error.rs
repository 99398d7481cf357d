use std::path::PathBuf;

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Scenario file {path:?} could not be read: {source}")]
    MissingScenario {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario file {path:?} is not a valid scenario: {source}")]
    ScenarioParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{subsystem} cannot be constructed: {field} {reason}")]
    Subsystem {
        subsystem: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Invalid time step: {dt}")]
    InvalidTimeStep { dt: f64 },

    #[error("Tick log error: {0}")]
    Log(#[from] std::io::Error),
}

/// Reject non-finite construction parameters. Finite values outside their
/// band are clamped by the subsystem and reported, not rejected.
pub(crate) fn require_finite(subsystem: &'static str, field: &'static str, value: f64) -> SimResult<f64> {
    if !value.is_finite() {
        return Err(SimError::Subsystem {
            subsystem,
            field,
            reason: format!("must be finite, got {value}"),
        });
    }
    Ok(value)
}
