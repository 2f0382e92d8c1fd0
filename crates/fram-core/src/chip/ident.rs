//! Device ID sequence and presence policy
//!
//! MB85RC parts answer an out-of-band identification sequence on the
//! reserved I2C address 0xF8 (8-bit form): the master writes the 8-bit form
//! of the chip's own address, then reads 3 bytes back from the reserved
//! address after a repeated start.

use embedded_hal::i2c::I2c;

use super::types::{manufacturer, DeviceId, Geometry};

/// Reserved I2C address of the device ID sequence (7-bit form of 0xF8)
pub const DEVICE_ID_ADDRESS: u8 = 0xF8 >> 1;

/// Lowest density code accepted by the presence check
///
/// The density code is a 4-bit field. This bound and [`MAX_DENSITY_CODE`]
/// are the first and last codes with an entry in
/// [`Geometry::from_density_code`].
pub const MIN_DENSITY_CODE: u16 = 0x03;

/// Highest density code accepted by the presence check
pub const MAX_DENSITY_CODE: u16 = 0x07;

/// Run the device ID sequence for the chip at `address`
///
/// Bus errors are returned as-is.
pub fn read_device_id<I: I2c + ?Sized>(i2c: &mut I, address: u8) -> Result<DeviceId, I::Error> {
    let mut raw = [0u8; 3];
    i2c.write_read(DEVICE_ID_ADDRESS, &[address << 1], &mut raw)?;
    Ok(DeviceId::from_raw(raw))
}

/// Decide whether an identified chip is usable
///
/// True only for a Fujitsu manufacturer code with a density code in 3..=7
/// that resolved to a non-empty geometry.
pub fn is_recognised(id: &DeviceId, geometry: &Geometry) -> bool {
    id.manufacturer == manufacturer::FUJITSU
        && (MIN_DENSITY_CODE..=MAX_DENSITY_CODE).contains(&id.density_code)
        && geometry.max_address != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_address() {
        assert_eq!(DEVICE_ID_ADDRESS, 0x7C);
    }

    #[test]
    fn test_recognised_requires_all_conditions() {
        for code in 0u16..=0x0F {
            let id = DeviceId {
                manufacturer: manufacturer::FUJITSU,
                product: code << 8,
                density_code: code,
            };
            let geometry = Geometry::from_density_code(code);
            assert_eq!(is_recognised(&id, &geometry), (3..=7).contains(&code));
        }
    }

    #[test]
    fn test_bounds_match_geometry_table() {
        for code in 0u16..=0x0F {
            assert_eq!(
                Geometry::from_density_code(code).is_valid(),
                (MIN_DENSITY_CODE..=MAX_DENSITY_CODE).contains(&code),
                "density code {}",
                code
            );
        }
    }

    #[test]
    fn test_foreign_manufacturer_rejected() {
        let id = DeviceId {
            manufacturer: manufacturer::CYPRESS,
            product: 0x510,
            density_code: 5,
        };
        assert!(!is_recognised(&id, &Geometry::from_density_code(5)));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        let id = DeviceId {
            manufacturer: manufacturer::FUJITSU,
            product: 0x510,
            density_code: 5,
        };
        assert!(!is_recognised(&id, &Geometry::NONE));
    }
}
