//! fram - A tool for I2C FRAM chips
//!
//! Reads, writes, erases and inspects MB85RC-family ferroelectric RAM
//! attached to an I2C bus.
//!
//! # Architecture
//!
//! All chip logic lives in the `fram-core` driver, which talks to hardware
//! only through the `embedded-hal` I2C and output-pin traits. Backends
//! provide those traits:
//! - **dummy** - An in-memory emulator, for testing without hardware
//! - **linux_i2c** - `/dev/i2c-N` plus an optional GPIO line for WP
//!
//! The same command implementations run on top of any backend.

mod backends;
mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Verbosity picks the default filter; RUST_LOG still overrides it
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command.backend() {
        Some(backend) => backends::with_device(backend, &cli.command),
        None => {
            commands::list_backends();
            Ok(())
        }
    }
}
