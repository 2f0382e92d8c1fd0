//! FRAM chip identification and geometry
//!
//! This module decodes the 24-bit word returned by the reserved device ID
//! sequence and maps the density code onto the chip's memory geometry.

mod ident;
mod types;

pub use ident::*;
pub use types::*;
