//! List commands implementation

use crate::backends;

/// List all supported backends
pub fn list_backends() {
    let backends = backends::available_backends();

    println!("Supported backends:");
    println!();

    if backends.is_empty() {
        println!("  (none, recompile with backend features enabled)");
        return;
    }

    for b in &backends {
        println!("  {:10} - {}", b.name, b.description);
        if !b.aliases.is_empty() {
            println!("  {:10}   aliases: {}", "", b.aliases.join(", "));
        }
    }

    println!();
    println!("Options for every backend:");
    println!("  addr=0x50-0x57    bus address of the chip");
    println!("  density=<kbit>    skip identification (4, 16, 64, 128, 256, 512, 1024)");
    println!("  wp_init=on|off    WP level applied at startup");
}
