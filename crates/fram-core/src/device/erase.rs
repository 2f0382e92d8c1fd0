//! Whole-chip erase
//!
//! FRAM has no erase command. Erasing means writing 0x00 to every offset,
//! one single-byte transaction per offset.

use embedded_hal::i2c::I2c;

use super::FramDevice;
use crate::error::{Error, Result};

/// Number of bytes between two progress callbacks
pub const ERASE_PROGRESS_STEP: u32 = 256;

/// Callback for progress reporting during erase
pub trait EraseProgress {
    /// Called before the first write
    fn erasing(&mut self, total_bytes: u32);

    /// Called every [`ERASE_PROGRESS_STEP`] bytes and once at the end
    fn erase_progress(&mut self, bytes_erased: u32);
}

/// A no-op progress reporter
pub struct NoProgress;

impl EraseProgress for NoProgress {
    fn erasing(&mut self, _total_bytes: u32) {}
    fn erase_progress(&mut self, _bytes_erased: u32) {}
}

impl<I2C: I2c, WP> FramDevice<I2C, WP> {
    /// Write 0x00 to every offset below [`max_address`](Self::max_address)
    ///
    /// Stops at the first failing write and returns
    /// [`Error::EraseFailed`] with that offset; later offsets are left
    /// untouched.
    pub fn erase_device(&mut self) -> Result<(), I2C::Error> {
        self.erase_device_with_progress(&mut NoProgress)
    }

    /// Erase the chip, reporting progress
    pub fn erase_device_with_progress<P: EraseProgress + ?Sized>(
        &mut self,
        progress: &mut P,
    ) -> Result<(), I2C::Error> {
        let total = self.geometry.max_address;
        if total == 0 {
            log::warn!("FRAM at {}: erase of unidentified chip, nothing to do", self.config.address);
        }

        log::info!("FRAM at {}: erasing {} bytes", self.config.address, total);
        progress.erasing(total);

        for addr in 0..total {
            if let Err(e) = self.write_byte(addr as u16, 0x00) {
                log::error!("FRAM at {}: erase stopped at 0x{:05X}", self.config.address, addr);
                return Err(match e {
                    Error::Bus(source) => Error::EraseFailed { addr, source },
                    other => other,
                });
            }
            if (addr + 1) % ERASE_PROGRESS_STEP == 0 {
                progress.erase_progress(addr + 1);
            }
        }

        if total % ERASE_PROGRESS_STEP != 0 {
            progress.erase_progress(total);
        }
        log::info!("FRAM at {}: erased", self.config.address);
        Ok(())
    }
}
