//! Write-protect pin support
//!
//! The WP input of an MB85RC chip blocks all writes while held high. The
//! driver only ever commands the line; it cannot read the chip's view of
//! it back, so [`WpStatus`] is the last commanded state and nothing more.
//!
//! When the line is not wired the driver is given no pin (or [`NoPin`] as
//! the type placeholder) and every WP operation reports
//! [`Error::WpNotManaged`](crate::Error::WpNotManaged).

use core::convert::Infallible;
use core::fmt;

use embedded_hal::digital::{ErrorType, OutputPin};

/// Last commanded write-protect state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WpStatus {
    /// WP driven high, writes blocked by the chip
    Enabled,
    /// WP driven low (or not wired), writes allowed
    #[default]
    Disabled,
}

impl WpStatus {
    /// Whether writes are blocked
    pub fn is_enabled(self) -> bool {
        self == WpStatus::Enabled
    }
}

impl From<bool> for WpStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            WpStatus::Enabled
        } else {
            WpStatus::Disabled
        }
    }
}

impl fmt::Display for WpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WpStatus::Enabled => write!(f, "enabled"),
            WpStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Type placeholder for a WP line that is not wired
///
/// Never constructed by the driver; use `None::<NoPin>` when building a
/// device without write-protect control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_bool() {
        assert_eq!(WpStatus::from(true), WpStatus::Enabled);
        assert_eq!(WpStatus::from(false), WpStatus::Disabled);
        assert!(WpStatus::Enabled.is_enabled());
        assert_eq!(WpStatus::default(), WpStatus::Disabled);
    }
}
