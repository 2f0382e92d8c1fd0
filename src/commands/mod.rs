//! CLI command implementations
//!
//! Every command runs against an already constructed `FramDevice`, so the
//! same implementation serves every backend. Commands that move data
//! refuse to run on a chip that was not detected.

mod access;
mod erase;
mod list;
mod probe;
mod read;
mod wp;
mod write;

pub use list::list_backends;

use crate::cli::{Commands, WpCommands};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use fram_core::FramDevice;
use indicatif::ProgressStyle;
use std::error::Error;

/// Run one chip command
pub fn run<I, W>(fram: &mut FramDevice<I, W>, command: &Commands) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
    W: OutputPin,
{
    match command {
        Commands::Probe { .. } => probe::run_probe(fram),
        Commands::Info { .. } => {
            probe::run_info(fram);
            Ok(())
        }
        Commands::Read {
            output,
            offset,
            length,
            ..
        } => {
            ensure_ready(fram)?;
            read::run_read(fram, output, *offset, *length)
        }
        Commands::Write {
            input,
            offset,
            no_verify,
            ..
        } => {
            ensure_ready(fram)?;
            write::run_write(fram, input, *offset, !*no_verify)
        }
        Commands::Verify { input, offset, .. } => {
            ensure_ready(fram)?;
            write::run_verify(fram, input, *offset)
        }
        Commands::Erase { .. } => {
            ensure_ready(fram)?;
            erase::run_erase(fram)
        }
        Commands::Peek { offset, width, .. } => {
            ensure_ready(fram)?;
            access::run_peek(fram, *offset, *width)
        }
        Commands::Poke {
            offset,
            value,
            width,
            ..
        } => {
            ensure_ready(fram)?;
            access::run_poke(fram, *offset, *value, *width)
        }
        Commands::Bit {
            op, offset, bit, ..
        } => {
            ensure_ready(fram)?;
            access::run_bit(fram, *op, *offset, *bit)
        }
        Commands::Wp(WpCommands::Status { .. }) => {
            wp::cmd_status(fram);
            Ok(())
        }
        Commands::Wp(WpCommands::Enable { .. }) => wp::cmd_enable(fram),
        Commands::Wp(WpCommands::Disable { .. }) => wp::cmd_disable(fram),
        Commands::ListBackends => {
            list_backends();
            Ok(())
        }
    }
}

fn ensure_ready<I, W>(fram: &FramDevice<I, W>) -> Result<(), Box<dyn Error>> {
    if fram.is_ready() {
        Ok(())
    } else {
        Err(format!(
            "No FRAM chip detected at {} (see 'fram info' for details)",
            fram.address()
        )
        .into())
    }
}

/// Check `[offset, offset + length)` against the chip and resolve a
/// missing length to "up to the end"
fn resolve_range(max_address: u32, offset: u16, length: Option<u32>) -> Result<u32, Box<dyn Error>> {
    let start = offset as u32;
    if start >= max_address {
        return Err(format!(
            "Offset 0x{:04X} is outside the chip (0x{:05X} bytes)",
            start, max_address
        )
        .into());
    }
    let length = length.unwrap_or(max_address - start);
    if length == 0 {
        return Err("Length must not be zero".into());
    }
    if length > max_address - start {
        return Err(format!(
            "0x{:X} bytes from 0x{:04X} run past the end of the chip (0x{:05X} bytes)",
            length, start, max_address
        )
        .into());
    }
    Ok(length)
}

/// Byte progress bar style shared by the transfer commands
fn bar_style(phase: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
            phase
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(32768, 0, None).unwrap(), 32768);
        assert_eq!(resolve_range(32768, 0x100, None).unwrap(), 32768 - 0x100);
        assert_eq!(resolve_range(32768, 0x100, Some(16)).unwrap(), 16);
        assert!(resolve_range(32768, 0x8000, None).is_err());
        assert!(resolve_range(32768, 0x7FFF, Some(2)).is_err());
        assert!(resolve_range(32768, 0, Some(0)).is_err());
        assert!(resolve_range(0, 0, None).is_err());
        assert!(resolve_range(32768, 0x10, Some(u32::MAX)).is_err());
        assert!(resolve_range(65536, 0xFFFF, Some(u32::MAX)).is_err());
        assert_eq!(resolve_range(65536, 0xFFFF, Some(1)).unwrap(), 1);
    }
}
