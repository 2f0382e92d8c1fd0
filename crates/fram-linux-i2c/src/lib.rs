//! fram-linux-i2c - Linux i2c-dev bus transport
//!
//! This crate provides an `embedded_hal::i2c::I2c` implementation on top of
//! the Linux `/dev/i2c-N` device interface, for driving FRAM chips from a
//! host with an I2C controller.
//!
//! # Overview
//!
//! Each transaction is sent with a single `I2C_RDWR` ioctl. Adjacent
//! operations of the same direction are merged into one kernel message, so
//! a framed memory write (address header followed by payload) goes out as
//! one message and a pointer write followed by a read gets a repeated start
//! in between.
//!
//! # Example
//!
//! ```no_run
//! use fram_core::{FramConfig, FramDevice, NoPin};
//! use fram_linux_i2c::LinuxI2c;
//!
//! let bus = LinuxI2c::open_device("/dev/i2c-1")?;
//! let mut fram = FramDevice::<_, NoPin>::new(bus, None, FramConfig::default())?;
//! if fram.is_ready() {
//!     println!("{} bytes", fram.max_address());
//!     println!("first byte: {:02X}", fram.read_byte(0)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with fram CLI
//!
//! ```bash
//! # Probe the chip at the default address on bus 1
//! fram probe -b linux_i2c:dev=/dev/i2c-1
//!
//! # Chip strapped to 0x52, with the WP line on GPIO 17
//! fram wp enable -b linux_i2c:bus=1,addr=0x52,wp_chip=/dev/gpiochip0,wp=17
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with i2c-dev support enabled (`CONFIG_I2C_CHARDEV`)
//! - Read/write access to `/dev/i2c-N` (usually the `i2c` group)
//! - An adapter that supports plain I2C transfers, not only SMBus

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, Functionality, LinuxI2c, LinuxI2cConfig, MsgFlags, MAX_MESSAGES};
pub use error::{LinuxI2cError, Result};

/// Open a Linux I2C bus from backend options
///
/// This is a convenience function for use in the CLI backend dispatch.
///
/// # Example Options
///
/// - `dev=/dev/i2c-1` - Device path
/// - `bus=1` - Bus number (alternative to dev)
pub fn open_linux_i2c(
    options: &[(&str, &str)],
) -> std::result::Result<LinuxI2c, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let bus = LinuxI2c::open(&config)?;
    Ok(bus)
}
