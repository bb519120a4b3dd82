//! Error types shared across the mcdaq crates.
//!
//! `DaqError` is the application-level error type; driver crates define
//! their own richer error enums and convert into it through
//! [`DriverError`], which classifies failures by [`DriverErrorKind`] so
//! callers can decide between aborting startup and logging-and-continuing.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type DaqResult<T> = std::result::Result<T, DaqError>;

/// Broad classification of a driver-originated failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    Initialization,
    Configuration,
    Communication,
    Hardware,
    Resource,
    Timeout,
    Unknown,
}

impl std::fmt::Display for DriverErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DriverErrorKind::Initialization => "initialization",
            DriverErrorKind::Configuration => "configuration",
            DriverErrorKind::Communication => "communication",
            DriverErrorKind::Hardware => "hardware",
            DriverErrorKind::Resource => "resource",
            DriverErrorKind::Timeout => "timeout",
            DriverErrorKind::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Error reported by a board/driver implementation.
#[derive(Error, Debug, Clone)]
#[error("Driver '{driver_type}' {kind} error: {message}")]
pub struct DriverError {
    pub driver_type: String,
    pub kind: DriverErrorKind,
    pub message: String,
}

impl DriverError {
    pub fn new(
        driver_type: impl Into<String>,
        kind: DriverErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            driver_type: driver_type.into(),
            kind,
            message: message.into(),
        }
    }

    /// Whether the failure is expected to clear on retry (a transient
    /// I/O fault rather than a configuration or resource problem).
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            DriverErrorKind::Communication | DriverErrorKind::Hardware | DriverErrorKind::Timeout
        )
    }
}

/// Primary error type for the acquisition application.
#[derive(Error, Debug)]
pub enum DaqError {
    /// Semantic configuration failure (unsupported model, empty channel
    /// set, unparseable channel name). Permanent; fix the config.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure surfaced by a board/driver implementation.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// File or OS level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_display_includes_kind() {
        let err = DriverError::new("mcc", DriverErrorKind::Hardware, "scan stalled");
        assert!(err.to_string().contains("hardware"));
        assert!(err.to_string().contains("scan stalled"));
    }

    #[test]
    fn transient_classification() {
        assert!(DriverError::new("mcc", DriverErrorKind::Timeout, "t").is_transient());
        assert!(!DriverError::new("mcc", DriverErrorKind::Configuration, "c").is_transient());
    }
}
