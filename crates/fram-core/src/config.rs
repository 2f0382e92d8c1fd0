//! Driver configuration

use core::fmt;

use crate::chip::Density;
use crate::wp::WpStatus;

/// Fixed upper nibble of every MB85RC bus address (`1010`)
pub const DEVICE_TYPE_CODE: u8 = 0b1010;

/// 7-bit bus address of an MB85RC chip
///
/// Only the eight addresses `0x50..=0x57` selected by the A2/A1/A0 pins
/// are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlaveAddress(u8);

impl SlaveAddress {
    /// Address with all select pins tied low
    pub const DEFAULT: Self = Self(DEVICE_TYPE_CODE << 3);

    /// Build the address from the state of the A2, A1 and A0 pins
    pub const fn from_pins(a2: bool, a1: bool, a0: bool) -> Self {
        Self((DEVICE_TYPE_CODE << 3) | ((a2 as u8) << 2) | ((a1 as u8) << 1) | a0 as u8)
    }

    /// The 7-bit address
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The A2/A1/A0 select bits
    pub const fn select_bits(self) -> u8 {
        self.0 & 0x07
    }
}

impl Default for SlaveAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for SlaveAddress {
    type Error = u8;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        if addr >> 3 == DEVICE_TYPE_CODE {
            Ok(Self(addr))
        } else {
            Err(addr)
        }
    }
}

impl fmt::Display for SlaveAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Configuration for a [`FramDevice`](crate::FramDevice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramConfig {
    /// Bus address of the chip
    pub address: SlaveAddress,
    /// Whether the WP line is wired and driven by this driver
    pub manage_wp: bool,
    /// Write-protect state to apply at construction
    pub initial_wp: WpStatus,
    /// Skip the device ID sequence and assume this density
    ///
    /// Required for parts without device ID support (MB85RC04V, MB85RC16,
    /// MB85RC64A, MB85RC128A, FM24CL64B, ...).
    pub density: Option<Density>,
}

impl FramConfig {
    /// Configuration for the chip at `address`, WP unmanaged, auto-identify
    pub const fn new(address: SlaveAddress) -> Self {
        Self {
            address,
            manage_wp: false,
            initial_wp: WpStatus::Disabled,
            density: None,
        }
    }

    /// Drive the WP pin and start in the given state
    pub const fn with_wp(mut self, initial: WpStatus) -> Self {
        self.manage_wp = true;
        self.initial_wp = initial;
        self
    }

    /// Use a fixed density instead of the device ID sequence
    pub const fn with_density(mut self, density: Density) -> Self {
        self.density = Some(density);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_pins() {
        assert_eq!(SlaveAddress::from_pins(false, false, false).get(), 0x50);
        assert_eq!(SlaveAddress::from_pins(false, false, true).get(), 0x51);
        assert_eq!(SlaveAddress::from_pins(true, false, true).get(), 0x55);
        assert_eq!(SlaveAddress::from_pins(true, true, true).get(), 0x57);
        assert_eq!(SlaveAddress::from_pins(true, true, false).select_bits(), 0b110);
    }

    #[test]
    fn test_address_validation() {
        for raw in 0x50u8..=0x57 {
            assert_eq!(SlaveAddress::try_from(raw).map(SlaveAddress::get), Ok(raw));
        }
        assert_eq!(SlaveAddress::try_from(0x4F), Err(0x4F));
        assert_eq!(SlaveAddress::try_from(0x58), Err(0x58));
        assert_eq!(SlaveAddress::try_from(0x7C), Err(0x7C));
    }

    #[test]
    fn test_config_defaults() {
        let config = FramConfig::default();
        assert_eq!(config.address.get(), 0x50);
        assert!(!config.manage_wp);
        assert_eq!(config.initial_wp, WpStatus::Disabled);
        assert_eq!(config.density, None);
    }

    #[test]
    fn test_config_builders() {
        let config = FramConfig::new(SlaveAddress::from_pins(false, true, false))
            .with_wp(WpStatus::Enabled)
            .with_density(Density::K16);
        assert_eq!(config.address.get(), 0x52);
        assert!(config.manage_wp);
        assert_eq!(config.initial_wp, WpStatus::Enabled);
        assert_eq!(config.density, Some(Density::K16));
    }
}
