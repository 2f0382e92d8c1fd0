//! Single-bit read-modify-write helpers
//!
//! Each mutation is a read followed by a write of the same byte. Nothing
//! stops another bus master from touching the byte in between.

use embedded_hal::i2c::I2c;

use super::FramDevice;
use crate::error::{Error, Result};

fn check_bit<E>(bit: u8) -> Result<u8, E> {
    if bit > 7 {
        Err(Error::InvalidBit(bit))
    } else {
        Ok(1 << bit)
    }
}

impl<I2C: I2c, WP> FramDevice<I2C, WP> {
    /// Read bit `bit` (0 = LSB) of the byte at `offset`
    pub fn read_bit(&mut self, offset: u16, bit: u8) -> Result<bool, I2C::Error> {
        let mask = check_bit(bit)?;
        Ok(self.read_byte(offset)? & mask != 0)
    }

    /// Set bit `bit` of the byte at `offset`
    pub fn set_bit(&mut self, offset: u16, bit: u8) -> Result<(), I2C::Error> {
        let mask = check_bit(bit)?;
        let value = self.read_byte(offset)?;
        self.write_byte(offset, value | mask)
    }

    /// Clear bit `bit` of the byte at `offset`
    pub fn clear_bit(&mut self, offset: u16, bit: u8) -> Result<(), I2C::Error> {
        let mask = check_bit(bit)?;
        let value = self.read_byte(offset)?;
        self.write_byte(offset, value & !mask)
    }

    /// Flip bit `bit` of the byte at `offset`
    ///
    /// Returns the new state of the bit.
    pub fn toggle_bit(&mut self, offset: u16, bit: u8) -> Result<bool, I2C::Error> {
        let mask = check_bit(bit)?;
        let value = self.read_byte(offset)?;
        let was_set = value & mask == mask;
        let value = if was_set { value & !mask } else { value | mask };
        self.write_byte(offset, value)?;
        Ok(!was_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[test]
    fn test_bit_masks() {
        for bit in 0u8..8 {
            assert_eq!(check_bit::<Infallible>(bit), Ok(1 << bit));
        }
        assert_eq!(check_bit::<Infallible>(8), Err(Error::InvalidBit(8)));
        assert_eq!(check_bit::<Infallible>(255), Err(Error::InvalidBit(255)));
    }
}
