//! Erase command implementation

use embedded_hal::i2c::I2c;
use fram_core::{EraseProgress, FramDevice};
use indicatif::ProgressBar;
use std::error::Error;

/// Progress reporter using an indicatif progress bar
struct IndicatifProgress {
    bar: ProgressBar,
}

impl EraseProgress for IndicatifProgress {
    fn erasing(&mut self, total_bytes: u32) {
        self.bar.set_length(total_bytes as u64);
    }

    fn erase_progress(&mut self, bytes_erased: u32) {
        self.bar.set_position(bytes_erased as u64);
    }
}

/// Run the erase command
pub fn run_erase<I, W>(fram: &mut FramDevice<I, W>) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
{
    let total = fram.max_address();

    let bar = ProgressBar::new(total as u64);
    bar.set_style(super::bar_style("Erasing"));
    let mut progress = IndicatifProgress { bar: bar.clone() };

    if let Err(e) = fram.erase_device_with_progress(&mut progress) {
        bar.abandon();
        return Err(format!("{} (code {})", e, e.code()).into());
    }

    bar.finish_with_message("Erase complete");
    println!("Erased {} bytes", total);
    Ok(())
}
