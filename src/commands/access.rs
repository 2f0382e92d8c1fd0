//! Peek, poke and bit command implementations

use crate::cli::{BitOp, Width};
use embedded_hal::i2c::I2c;
use fram_core::FramDevice;
use std::error::Error;

fn width_bytes(width: Width) -> u32 {
    match width {
        Width::Byte => 1,
        Width::Word => 2,
        Width::Long => 4,
    }
}

fn check_access(max_address: u32, offset: u16, width: Width) -> Result<(), Box<dyn Error>> {
    if offset as u32 + width_bytes(width) > max_address {
        return Err(format!(
            "Access at 0x{:04X} runs past the end of the chip (0x{:05X} bytes)",
            offset, max_address
        )
        .into());
    }
    Ok(())
}

/// Read one value and print it
pub fn run_peek<I, W>(
    fram: &mut FramDevice<I, W>,
    offset: u16,
    width: Width,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    check_access(fram.max_address(), offset, width)?;
    match width {
        Width::Byte => println!("0x{:04X}: 0x{:02X}", offset, fram.read_byte(offset)?),
        Width::Word => println!("0x{:04X}: 0x{:04X}", offset, fram.read_word(offset)?),
        Width::Long => println!("0x{:04X}: 0x{:08X}", offset, fram.read_long(offset)?),
    }
    Ok(())
}

/// Write one value
pub fn run_poke<I, W>(
    fram: &mut FramDevice<I, W>,
    offset: u16,
    value: u32,
    width: Width,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    check_access(fram.max_address(), offset, width)?;
    let too_wide = || format!("Value 0x{:X} does not fit in a {:?}", value, width);
    match width {
        Width::Byte => fram.write_byte(offset, u8::try_from(value).map_err(|_| too_wide())?)?,
        Width::Word => fram.write_word(offset, u16::try_from(value).map_err(|_| too_wide())?)?,
        Width::Long => fram.write_long(offset, value)?,
    }
    log::info!("Wrote 0x{:X} at 0x{:04X}", value, offset);
    Ok(())
}

/// Read or modify one bit
pub fn run_bit<I, W>(
    fram: &mut FramDevice<I, W>,
    op: BitOp,
    offset: u16,
    bit: u8,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    check_access(fram.max_address(), offset, Width::Byte)?;
    match op {
        BitOp::Read => {
            let set = fram.read_bit(offset, bit)?;
            println!("0x{:04X} bit {}: {}", offset, bit, set as u8);
        }
        BitOp::Set => fram.set_bit(offset, bit)?,
        BitOp::Clear => fram.clear_bit(offset, bit)?,
        BitOp::Toggle => {
            let set = fram.toggle_bit(offset, bit)?;
            println!("0x{:04X} bit {}: {}", offset, bit, set as u8);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_access() {
        assert!(check_access(32768, 0x7FFF, Width::Byte).is_ok());
        assert!(check_access(32768, 0x7FFF, Width::Word).is_err());
        assert!(check_access(32768, 0x7FFC, Width::Long).is_ok());
        assert!(check_access(32768, 0x7FFD, Width::Long).is_err());
    }
}
