//! Error types for Linux I2C operations

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use thiserror::Error;

/// Linux I2C specific errors
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to query adapter functionality
    #[error("Failed to query adapter functionality: {0}")]
    FunctionalityFailed(#[source] std::io::Error),

    /// Adapter cannot do plain I2C transfers
    #[error("Adapter {0} does not support plain I2C transfers (SMBus-only?)")]
    NotSupported(String),

    /// I2C_RDWR transfer failed
    #[error("I2C transfer to 0x{addr:02X} failed: {source}")]
    TransferFailed {
        addr: u8,
        #[source]
        source: std::io::Error,
    },

    /// Transaction needs more messages than the kernel accepts
    #[error("Transaction has {0} messages, kernel limit is 42")]
    TooManyMessages(usize),

    /// Single message longer than the kernel can describe
    #[error("Message of {0} bytes exceeds the 65535 byte limit")]
    MessageTooLong(usize),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device not specified
    #[error("No device specified. Use dev=/dev/i2c-N or bus=N")]
    NoDevice,
}

impl embedded_hal::i2c::Error for LinuxI2cError {
    fn kind(&self) -> ErrorKind {
        let Self::TransferFailed { source, .. } = self else {
            return ErrorKind::Other;
        };
        match source.raw_os_error() {
            Some(libc::ENXIO) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Some(libc::EREMOTEIO) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Some(libc::EAGAIN) => ErrorKind::ArbitrationLoss,
            Some(libc::EPROTO) | Some(libc::ETIMEDOUT) => ErrorKind::Bus,
            _ => ErrorKind::Other,
        }
    }
}

/// Result type for Linux I2C operations
pub type Result<T> = std::result::Result<T, LinuxI2cError>;

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::Error as _;

    fn transfer_error(errno: i32) -> LinuxI2cError {
        LinuxI2cError::TransferFailed {
            addr: 0x50,
            source: std::io::Error::from_raw_os_error(errno),
        }
    }

    #[test]
    fn test_errno_kinds() {
        assert_eq!(
            transfer_error(libc::ENXIO).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert_eq!(
            transfer_error(libc::EREMOTEIO).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        );
        assert_eq!(transfer_error(libc::EAGAIN).kind(), ErrorKind::ArbitrationLoss);
        assert_eq!(transfer_error(libc::EIO).kind(), ErrorKind::Other);
        assert_eq!(LinuxI2cError::NoDevice.kind(), ErrorKind::Other);
    }
}
