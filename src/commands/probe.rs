//! Probe and info command implementations

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use fram_core::chip::AddressMode;
use fram_core::{FramDevice, IdField};
use std::error::Error;

/// Re-run identification and print a one-line summary
pub fn run_probe<I, W>(fram: &mut FramDevice<I, W>) -> Result<(), Box<dyn Error>>
where
    I: I2c,
    I::Error: 'static,
    W: OutputPin,
{
    match fram.check_device() {
        Ok(()) => {
            let id = fram.device_id();
            let geometry = fram.geometry();
            let source = if id.is_manual() {
                "manual density".to_string()
            } else {
                format!("{} product 0x{:03X}", id.vendor(), id.product)
            };
            println!(
                "Found FRAM at {}: {} Kbit ({} bytes), {}",
                fram.address(),
                geometry.density_kbit,
                geometry.max_address,
                source
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Probe failed: {} (code {})", e, e.code());
            Err(Box::new(e))
        }
    }
}

fn describe_addressing(mode: AddressMode) -> String {
    match mode {
        AddressMode::TwoByte => "2-byte word address".to_string(),
        AddressMode::OneByte { page_bits } => format!(
            "1-byte word address, {} page bit(s) in the device address",
            page_bits
        ),
    }
}

/// Print everything the driver knows about the chip
pub fn run_info<I, W>(fram: &FramDevice<I, W>) {
    let id = fram.device_id();
    let geometry = fram.geometry();

    println!("FRAM Information");
    println!("================");
    println!();
    println!("Address:         {}", fram.address());
    println!("Ready:           {}", if fram.is_ready() { "yes" } else { "no" });
    println!(
        "Mode:            {}",
        if fram.config().density.is_some() {
            "manual density"
        } else {
            "device ID"
        }
    );
    println!(
        "Manufacturer:    0x{:03X} ({})",
        fram.id_field(IdField::Manufacturer),
        id.vendor()
    );
    println!("Product ID:      0x{:03X}", fram.id_field(IdField::Product));
    println!("Density code:    0x{:X}", fram.id_field(IdField::DensityCode));
    println!("Density:         {} Kbit", fram.id_field(IdField::Density));
    println!(
        "Size:            {} bytes ({} KiB)",
        geometry.max_address,
        geometry.max_address / 1024
    );
    println!("Addressing:      {}", describe_addressing(geometry.address_mode));
    if fram.is_wp_managed() {
        println!("Write protect:   {} (last commanded)", fram.wp_status());
    } else {
        println!("Write protect:   not managed");
    }
}
