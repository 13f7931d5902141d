//! Simulator Error Types.
//!
//! Register operations themselves are total and never fail. Everything that
//! touches the host (log files, configuration, report sinks) or that can
//! diverge (a kernel that never settles) reports through [`SimError`].

use thiserror::Error;

/// Errors surfaced by the simulation infrastructure.
#[derive(Debug, Error)]
pub enum SimError {
    /// Host I/O failure while writing a report or a persistence stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A change-log entry could not be serialized or parsed.
    #[error("change log encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// `change_save` was called on a logging register with no bound file.
    #[error("no log file bound for device '{0}'")]
    LogNotBound(String),

    /// Update requests kept arriving past the configured delta budget.
    #[error("cycle {cycle} did not settle within {limit} delta cycles")]
    DeltaLimit { cycle: u64, limit: usize },

    /// Advancing by one period would overflow simulated time.
    #[error("simulated time overflowed at cycle {cycle}")]
    TimeOverflow { cycle: u64 },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
