//! fram-linux-gpio - Linux GPIO write-protect line
//!
//! This crate provides an `embedded_hal::digital::OutputPin` for the WP
//! input of an FRAM chip, using the Linux character device GPIO interface
//! (gpiocdev).
//!
//! # Example
//!
//! ```no_run
//! use embedded_hal::digital::OutputPin;
//! use fram_core::WpStatus;
//! use fram_linux_gpio::{LinuxGpioConfig, LinuxGpioPin};
//!
//! // WP on line 17, held high (writes blocked) from the moment it is requested
//! let config = LinuxGpioConfig::new("/dev/gpiochip0", 17).with_initial(WpStatus::Enabled);
//! let mut wp = LinuxGpioPin::open(&config)?;
//!
//! // Allow writes
//! wp.set_low()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The pin is requested as an output at open time, already driven to the
//! configured initial level, so there is no glitch before the driver takes
//! over.
//!
//! # Usage with fram CLI
//!
//! ```bash
//! fram wp status -b linux_i2c:bus=1,wp_chip=/dev/gpiochip0,wp=17
//! fram wp disable -b linux_i2c:bus=1,wp_gpiochip=0,wp=17
//! ```
//!
//! # GPIO Pin Wiring
//!
//! | FRAM Pin | Connection | Description |
//! |----------|------------|-------------|
//! | WP       | GPIO line  | High blocks all writes |
//! | A0-A2    | GND/VCC    | Address select |
//! | SDA/SCL  | I2C bus    | With pull-ups |
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxGpioConfig, LinuxGpioPin};
pub use error::{LinuxGpioError, Result};

/// Open the WP line described by backend options, if any
///
/// This is a convenience function for use in the CLI backend dispatch.
///
/// # Example Options
///
/// - `wp_chip=/dev/gpiochip0` - GPIO chip device path (or use wp_gpiochip=N)
/// - `wp_gpiochip=0` - GPIO chip number (alternative to wp_chip)
/// - `wp=17` - WP line offset
/// - `wp_init=on` - Level driven when the line is requested (default: off)
pub fn open_wp_pin(
    options: &[(&str, &str)],
) -> std::result::Result<Option<LinuxGpioPin>, Box<dyn std::error::Error>> {
    match parse_options(options)? {
        Some(config) => Ok(Some(LinuxGpioPin::open(&config)?)),
        None => Ok(None),
    }
}
