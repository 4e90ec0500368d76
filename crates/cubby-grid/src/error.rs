#![forbid(unsafe_code)]

//! Grid error types.

use std::fmt;

/// Errors surfaced by mutating grid operations.
///
/// Only precondition violations become error values. Transient input
/// anomalies (stale pointer ids), capacity anomalies (full grid on add),
/// and data anomalies (duplicate stored slots at load) are recovered
/// locally with a diagnostic and never abort the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A mutating call needed the data provider before one was set.
    ProviderMissing,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderMissing => write!(f, "data provider is not set"),
        }
    }
}

impl std::error::Error for GridError {}
