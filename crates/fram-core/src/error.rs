//! Error types for fram-core
//!
//! This module provides a no_std compatible error type. Bus errors are
//! carried verbatim; everything else is a failure of the driver's own logic
//! and never shares a code with the transport.

use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

/// Driver error, generic over the bus transport's error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus transport reported a failure (NACK, arbitration loss, ...)
    Bus(E),
    /// The bus transaction succeeded but the chip was not recognised
    Unidentified,
    /// Bit position outside 0..=7
    InvalidBit(u8),
    /// A write-protect operation was requested but the pin is not managed
    WpNotManaged,
    /// Write-protect management was configured without a pin
    MissingWpPin,
    /// Driving the write-protect pin failed
    Pin,
    /// A read of zero bytes was requested
    ZeroLengthRead,
    /// Unknown selector passed to an ID field lookup
    InvalidIdField(u8),
    /// Erase stopped at `addr` because the write at that address failed
    EraseFailed {
        /// Address of the failing single-byte write
        addr: u32,
        /// Bus error returned for that write
        source: E,
    },
}

impl<E: embedded_hal::i2c::Error> Error<E> {
    /// Numeric status in the classic Arduino `Wire` numbering.
    ///
    /// Bus failures map to 2 (NACK on address), 3 (NACK on data) or 4
    /// (other). Driver codes: 5 unknown ID field, 7 chip unidentified,
    /// 8 zero-length read, 9 bit out of range, 10 WP not managed.
    pub fn code(&self) -> u8 {
        match self {
            Self::Bus(e) | Self::EraseFailed { source: e, .. } => bus_code(e.kind()),
            Self::InvalidIdField(_) => 5,
            Self::Unidentified => 7,
            Self::ZeroLengthRead => 8,
            Self::InvalidBit(_) => 9,
            Self::WpNotManaged | Self::MissingWpPin => 10,
            Self::Pin => 4,
        }
    }
}

impl<E> Error<E> {
    /// Whether this error originated on the bus rather than in the driver
    pub fn is_bus_error(&self) -> bool {
        matches!(self, Self::Bus(_) | Self::EraseFailed { .. })
    }
}

fn bus_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => 2,
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => 3,
        _ => 4,
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "I2C bus error: {:?}", e),
            Self::Unidentified => write!(f, "FRAM chip not identified"),
            Self::InvalidBit(bit) => write!(f, "bit position {} out of range (0-7)", bit),
            Self::WpNotManaged => write!(f, "write-protect pin is not managed"),
            Self::MissingWpPin => {
                write!(f, "write-protect management enabled but no pin given")
            }
            Self::Pin => write!(f, "failed to drive write-protect pin"),
            Self::ZeroLengthRead => write!(f, "number of bytes to read is zero"),
            Self::InvalidIdField(sel) => write!(f, "unknown device ID field {}", sel),
            Self::EraseFailed { addr, source } => {
                write!(f, "erase stopped at address 0x{:05X}: {:?}", addr, source)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

/// Result type alias using the core Error type
pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_codes() {
        let nack_addr: Error<ErrorKind> =
            Error::Bus(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        let nack_data: Error<ErrorKind> =
            Error::Bus(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        let other: Error<ErrorKind> = Error::Bus(ErrorKind::ArbitrationLoss);
        assert_eq!(nack_addr.code(), 2);
        assert_eq!(nack_data.code(), 3);
        assert_eq!(other.code(), 4);
    }

    #[test]
    fn test_driver_codes_do_not_collide_with_bus() {
        let driver: [Error<ErrorKind>; 4] = [
            Error::Unidentified,
            Error::ZeroLengthRead,
            Error::InvalidBit(8),
            Error::WpNotManaged,
        ];
        let codes: [u8; 4] = [7, 8, 9, 10];
        for (err, code) in driver.iter().zip(codes) {
            assert_eq!(err.code(), code);
            assert!(!err.is_bus_error());
        }
    }

    #[test]
    fn test_erase_failure_keeps_bus_code() {
        let err: Error<ErrorKind> = Error::EraseFailed {
            addr: 0x100,
            source: ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        };
        assert_eq!(err.code(), 3);
        assert!(err.is_bus_error());
    }
}
