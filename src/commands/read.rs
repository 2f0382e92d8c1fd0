//! Read command implementation

use super::{bar_style, resolve_range};
use embedded_hal::i2c::I2c;
use fram_core::device::CHUNK_SIZE;
use fram_core::FramDevice;
use indicatif::ProgressBar;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Run the read command
pub fn run_read<I, W>(
    fram: &mut FramDevice<I, W>,
    output: &Path,
    offset: u16,
    length: Option<u32>,
) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    let length = resolve_range(fram.max_address(), offset, length)?;

    let data = read_with_progress(fram, offset, length as usize)?;

    let mut file = File::create(output)?;
    file.write_all(&data)?;

    println!("Wrote {} bytes to {:?}", data.len(), output);

    Ok(())
}

/// Read `length` bytes from `offset` with progress bar
pub fn read_with_progress<I, W>(
    fram: &mut FramDevice<I, W>,
    offset: u16,
    length: usize,
) -> Result<Vec<u8>, Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    let mut data = vec![0u8; length];

    let pb = ProgressBar::new(length as u64);
    pb.set_style(bar_style("Reading"));

    let mut pos = offset;
    for (i, chunk) in data.chunks_mut(CHUNK_SIZE).enumerate() {
        if let Err(e) = fram.read_array(pos, chunk) {
            pb.abandon();
            return Err(format!("Read failed at 0x{:04X}: {} (code {})", pos, e, e.code()).into());
        }
        pos = pos.wrapping_add(chunk.len() as u16);
        pb.set_position(((i + 1) * CHUNK_SIZE).min(length) as u64);
    }

    pb.finish_with_message("Read complete");
    Ok(data)
}
