//! Error types for Linux GPIO write-protect operations

use thiserror::Error;

/// Linux GPIO specific errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to request the WP line
    #[error("Failed to request GPIO line {line} on '{path}': {source}")]
    LineRequestFailed {
        path: String,
        line: u32,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to set GPIO line value
    #[error("Failed to set GPIO line value: {0}")]
    SetValueFailed(#[source] gpiocdev::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// GPIO chip or device not specified
    #[error("No GPIO chip specified. Use wp_chip=/dev/gpiochipN or wp_gpiochip=N")]
    NoDevice,

    /// WP line not specified
    #[error("No WP line specified. Use wp=<offset>")]
    NoLine,
}

impl embedded_hal::digital::Error for LinuxGpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Result type for Linux GPIO operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;
