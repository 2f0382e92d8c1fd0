//! Write and verify command implementations

use super::read::read_with_progress;
use super::{bar_style, resolve_range};
use embedded_hal::i2c::I2c;
use fram_core::device::CHUNK_SIZE;
use fram_core::FramDevice;
use indicatif::ProgressBar;
use std::error::Error;
use std::fs;
use std::path::Path;

fn load_image(input: &Path, max_address: u32, offset: u16) -> Result<Vec<u8>, Box<dyn Error>> {
    let data = fs::read(input)?;
    println!("Read {} bytes from {:?}", data.len(), input);

    if data.is_empty() {
        return Err(format!("{:?} is empty", input).into());
    }
    resolve_range(max_address, offset, Some(data.len() as u32))?;
    Ok(data)
}

/// Run the write command
pub fn run_write<I, W>(
    fram: &mut FramDevice<I, W>,
    input: &Path,
    offset: u16,
    verify: bool,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    let data = load_image(input, fram.max_address(), offset)?;

    let pb = ProgressBar::new(data.len() as u64);
    pb.set_style(bar_style("Writing"));

    let mut pos = offset;
    for (i, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        if let Err(e) = fram.write_array(pos, chunk) {
            pb.abandon();
            return Err(
                format!("Write failed at 0x{:04X}: {} (code {})", pos, e, e.code()).into(),
            );
        }
        pos = pos.wrapping_add(chunk.len() as u16);
        pb.set_position(((i + 1) * CHUNK_SIZE).min(data.len()) as u64);
    }
    pb.finish_with_message("Write complete");

    if verify {
        compare(fram, &data, offset)?;
        println!("Verification passed!");
    }

    println!("Wrote {} bytes at 0x{:04X}", data.len(), offset);
    Ok(())
}

/// Run the verify command
pub fn run_verify<I, W>(
    fram: &mut FramDevice<I, W>,
    input: &Path,
    offset: u16,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    let expected = load_image(input, fram.max_address(), offset)?;
    compare(fram, &expected, offset)?;
    println!("Verification passed!");
    Ok(())
}

fn compare<I, W>(
    fram: &mut FramDevice<I, W>,
    expected: &[u8],
    offset: u16,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    let actual = read_with_progress(fram, offset, expected.len())?;
    if let Some(i) = first_mismatch(expected, &actual) {
        return Err(format!(
            "Verification failed at 0x{:04X}: expected 0x{:02X}, got 0x{:02X}",
            offset as usize + i,
            expected[i],
            actual[i]
        )
        .into());
    }
    Ok(())
}

fn first_mismatch(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected.iter().zip(actual).position(|(a, b)| a != b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_mismatch() {
        assert_eq!(first_mismatch(&[1, 2, 3], &[1, 2, 3]), None);
        assert_eq!(first_mismatch(&[1, 2, 3], &[1, 0, 3]), Some(1));
    }
}
