//! Error type for the acquisition engine.

use mcdaq_core::error::{DaqError, DriverError};
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, McError>;

/// Errors that can occur while configuring or running the engine.
///
/// Only configuration and start-up failures reach callers; steady-state
/// poll faults are logged and absorbed so a dropped hardware cycle does
/// not halt acquisition of subsequent cycles.
#[derive(Error, Debug)]
pub enum McError {
    /// Configuration failed to parse or is semantically invalid. An
    /// unsupported `daq_model` surfaces here too, rejected at parse
    /// time.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No analog channel in the monitored set (scan demux needs one).
    #[error("No analog channels specified to monitor")]
    NoAnalogChannels,

    /// Failure surfaced by the board implementation.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl From<McError> for DaqError {
    fn from(err: McError) -> Self {
        match err {
            McError::Driver(e) => DaqError::Driver(e),
            other => DaqError::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcdaq_core::error::DriverErrorKind;

    #[test]
    fn config_errors_classify_as_configuration() {
        let err: DaqError = McError::InvalidConfig {
            message: "unknown variant `MC-USB-9999`".to_string(),
        }
        .into();
        assert!(matches!(err, DaqError::Configuration(_)));
        assert!(err.to_string().contains("MC-USB-9999"));
    }

    #[test]
    fn driver_errors_pass_through() {
        let inner = DriverError::new("mock", DriverErrorKind::Hardware, "stalled");
        let err: DaqError = McError::Driver(inner).into();
        assert!(matches!(err, DaqError::Driver(_)));
    }
}
