//! Write protection command implementations

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use fram_core::{Error as FramError, FramDevice};
use std::error::Error;

const NOT_MANAGED_HINT: &str =
    "No WP line configured. Add wp_chip=/dev/gpiochipN,wp=<line> (or wp=on for dummy)";

fn wp_error<E: embedded_hal::i2c::Error + 'static>(e: FramError<E>) -> Box<dyn Error> {
    match e {
        FramError::WpNotManaged => format!("{} (code {})", NOT_MANAGED_HINT, e.code()).into(),
        other => Box::new(other),
    }
}

/// Show the write-protect state
pub fn cmd_status<I, W>(fram: &FramDevice<I, W>) {
    if fram.is_wp_managed() {
        println!("Write protect: {} (last commanded)", fram.wp_status());
    } else {
        println!("Write protect: not managed");
    }
}

/// Drive WP high
pub fn cmd_enable<I, W>(fram: &mut FramDevice<I, W>) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
    W: OutputPin,
{
    fram.enable_wp().map_err(wp_error)?;
    println!("Write protect enabled");
    Ok(())
}

/// Drive WP low
pub fn cmd_disable<I, W>(fram: &mut FramDevice<I, W>) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
    W: OutputPin,
{
    fram.disable_wp().map_err(wp_error)?;
    println!("Write protect disabled");
    Ok(())
}
