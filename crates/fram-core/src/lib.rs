//! fram-core - Core driver for I2C FRAM memory chips
//!
//! This crate drives a single MB85RC-family ferroelectric RAM attached to an
//! I2C bus. It identifies the chip through the reserved device ID sequence,
//! derives the memory geometry from the reported density code, and exposes
//! byte, word, bit and array access on top of two bus primitives. It is
//! `no_std` and talks to hardware exclusively through the `embedded-hal`
//! 1.0 `I2c` and `OutputPin` traits.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`), adds
//!   `std::error::Error` for the error type
//! - `alloc` - Enable heap allocation for buffered helpers
//!
//! # Example
//!
//! ```ignore
//! use fram_core::{FramConfig, FramDevice, NoPin, SlaveAddress};
//!
//! fn dump<I: embedded_hal::i2c::I2c>(i2c: I) {
//!     let config = FramConfig::new(SlaveAddress::from_pins(false, false, false));
//!     let mut fram = FramDevice::<_, NoPin>::new(i2c, None, config).unwrap();
//!     if fram.is_ready() {
//!         println!("{} bytes", fram.geometry().max_address);
//!         let value = fram.read_word(0x0010).unwrap();
//!         println!("word at 0x0010: {:#06x}", value);
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod config;
pub mod device;
pub mod error;
pub mod wp;

pub use chip::{Density, DeviceId, Geometry, IdField};
pub use config::{FramConfig, SlaveAddress};
pub use device::{EraseProgress, FramDevice, NoProgress};
pub use error::{Error, Result};
pub use wp::{NoPin, WpStatus};
