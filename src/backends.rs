//! Backend registration and dispatch
//!
//! This module provides a centralized registry for all bus backends, with
//! support for feature-gated inclusion and dynamic help text generation.
//! A backend is selected with a string of the form
//! `name[:key=value,...]`.
//!
//! Options understood by every backend:
//!
//! - `addr=0x50` - Bus address of the chip (0x50-0x57)
//! - `density=<kbit>` - Skip identification and assume this density
//! - `wp_init=on|off` - WP level applied at startup when a WP line is given

use crate::cli::{parse_hex_u32, Commands};
use crate::commands;

use fram_core::{Density, FramConfig, FramDevice, SlaveAddress, WpStatus};
use thiserror::Error;

/// Keys consumed by [`CommonOptions`]
#[cfg_attr(not(feature = "linux-i2c"), allow(dead_code))]
const COMMON_KEYS: &[&str] = &["addr", "density", "wp_init"];

/// Information about a backend
pub struct BackendInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Backend option errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Option value could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidOption { key: &'static str, value: String },

    /// Address outside 0x50..=0x57
    #[error("Bus address 0x{0:02X} is not an MB85RC address (0x50-0x57)")]
    BadAddress(u32),

    /// Density not in the table
    #[error("Unsupported density {0}K (use 4, 16, 64, 128, 256, 512 or 1024)")]
    BadDensity(u32),
}

/// Get information about all available backends (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<BackendInfo> {
    let mut backends = Vec::new();

    #[cfg(feature = "dummy")]
    backends.push(BackendInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory FRAM emulator (density=<kbit>,mfr=<id>,fail_at=<offset>,wp=on)",
    });

    #[cfg(feature = "linux-i2c")]
    backends.push(BackendInfo {
        name: "linux_i2c",
        aliases: &["linux-i2c", "i2cdev"],
        description: "Linux i2c-dev (dev=/dev/i2c-N or bus=N, wp_chip=/dev/gpiochipN,wp=<line>)",
    });

    backends
}

/// Generate help text listing all available backends
pub fn backend_help() -> String {
    let backends = available_backends();

    if backends.is_empty() {
        return "No backends available (recompile with backend features enabled)".to_string();
    }

    let mut help = String::from("Available backends:\n");
    for b in &backends {
        help.push_str(&format!("  {:12} - {}\n", b.name, b.description));
    }
    help
}

/// Map a backend name or alias to its primary name
pub fn find_backend(name: &str) -> Option<&'static str> {
    available_backends()
        .into_iter()
        .find(|b| b.name == name || b.aliases.contains(&name))
        .map(|b| b.name)
}

/// Parse a backend string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_backend_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

/// Options that shape the driver configuration, shared by all backends
#[derive(Debug, Clone, Default)]
pub struct CommonOptions {
    /// Bus address of the chip
    pub address: SlaveAddress,
    /// Manual density, skipping identification
    pub density: Option<Density>,
    /// WP level applied at startup
    pub wp_init: WpStatus,
}

impl CommonOptions {
    /// Extract the shared options
    pub fn parse(options: &[(&str, &str)]) -> Result<Self, BackendError> {
        let mut common = Self::default();

        for (key, value) in options {
            match *key {
                "addr" => {
                    let addr = parse_number("addr", value)?;
                    common.address = u8::try_from(addr)
                        .ok()
                        .and_then(|a| SlaveAddress::try_from(a).ok())
                        .ok_or(BackendError::BadAddress(addr))?;
                }
                "density" => {
                    common.density = Some(parse_density(value)?);
                }
                "wp_init" => {
                    common.wp_init = match *value {
                        "on" | "1" | "enabled" => WpStatus::Enabled,
                        "off" | "0" | "disabled" => WpStatus::Disabled,
                        _ => {
                            return Err(BackendError::InvalidOption {
                                key: "wp_init",
                                value: value.to_string(),
                            })
                        }
                    };
                }
                _ => {}
            }
        }

        Ok(common)
    }

    /// Driver configuration; WP is managed exactly when a pin is present
    pub fn config(&self, has_wp_pin: bool) -> FramConfig {
        let mut config = FramConfig::new(self.address);
        if has_wp_pin {
            config = config.with_wp(self.wp_init);
        }
        if let Some(density) = self.density {
            config = config.with_density(density);
        }
        config
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u32, BackendError> {
    parse_hex_u32(value).map_err(|_| BackendError::InvalidOption {
        key,
        value: value.to_string(),
    })
}

/// Parse a density given in Kbit
pub fn parse_density(value: &str) -> Result<Density, BackendError> {
    let kbit = parse_number("density", value)?;
    u16::try_from(kbit)
        .ok()
        .and_then(Density::from_kbit)
        .ok_or(BackendError::BadDensity(kbit))
}

/// Options without the shared ones, for backend-specific parsers
#[cfg_attr(not(feature = "linux-i2c"), allow(dead_code))]
fn backend_options<'a>(options: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    options
        .iter()
        .filter(|(k, _)| !COMMON_KEYS.contains(k) && !k.starts_with("wp"))
        .copied()
        .collect()
}

#[cfg(feature = "dummy")]
mod dummy {
    use super::{parse_density, parse_number, BackendError, CommonOptions};

    use fram_core::chip::manufacturer;
    use fram_core::Density;
    use fram_dummy::{DummyConfig, DummyFram, DummyPin};

    /// Emulated chip with its optional WP pin
    ///
    /// Here `density` selects the emulated part. It only turns on manual
    /// density in `common` for parts that lack a device ID.
    pub fn open(
        options: &[(&str, &str)],
        common: &mut CommonOptions,
    ) -> Result<(DummyFram, Option<DummyPin>), BackendError> {
        common.density = None;
        let mut density = Density::K256;
        let mut mfr: Option<u32> = None;
        let mut fail_at: Option<u32> = None;
        let mut with_wp = false;

        for (key, value) in options {
            match *key {
                "density" => density = parse_density(value)?,
                "mfr" => mfr = Some(parse_number("mfr", value)?),
                "fail_at" => fail_at = Some(parse_number("fail_at", value)?),
                "wp" => {
                    with_wp = match *value {
                        "on" | "1" => true,
                        "off" | "0" => false,
                        _ => {
                            return Err(BackendError::InvalidOption {
                                key: "wp",
                                value: value.to_string(),
                            })
                        }
                    }
                }
                "addr" | "wp_init" => {}
                _ => log::warn!("dummy: Unknown option: {}={}", key, value),
            }
        }

        let mut config = match density {
            Density::K64 => DummyConfig::mb85rc64ta(),
            Density::K256 => DummyConfig::mb85rc256v(),
            Density::K512 => DummyConfig::mb85rc512t(),
            Density::K1024 => DummyConfig::mb85rc1mt(),
            // No device ID on these parts, so the driver needs the density
            Density::K4 | Density::K16 | Density::K128 => {
                common.density = Some(density);
                DummyConfig::without_id(density)
            }
        };
        config = config.with_address(common.address.get());

        if let (Some(mfr), Some(id)) = (mfr, config.id.as_mut()) {
            id.manufacturer = mfr as u16 & 0x0FFF;
            if id.manufacturer != manufacturer::FUJITSU {
                log::info!("dummy: Emulating manufacturer 0x{:03X}", id.manufacturer);
            }
        }

        log::info!(
            "dummy: Emulating {} chip ({} bytes) at {}",
            density,
            config.size,
            common.address
        );

        let mut bus = DummyFram::new(config);
        bus.fail_write_at(fail_at.map(|a| a as usize));

        let pin = with_wp.then(|| {
            let pin = DummyPin::new();
            bus.attach_wp(pin.probe());
            pin
        });

        Ok((bus, pin))
    }
}

/// Open the backend named in `backend` and run `command` against it
pub fn with_device(backend: &str, command: &Commands) -> Result<(), Box<dyn std::error::Error>> {
    let (name, options) = parse_backend_string(backend);

    let canonical_name = match find_backend(name) {
        Some(n) => n,
        None => return Err(unknown_backend_error(name)),
    };

    #[allow(unused_mut)]
    let mut common = CommonOptions::parse(&options)?;

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            let (bus, pin) = dummy::open(&options, &mut common)?;
            let config = common.config(pin.is_some());
            let mut fram = FramDevice::new(bus, pin, config)?;
            commands::run(&mut fram, command)
        }

        #[cfg(feature = "linux-i2c")]
        "linux_i2c" => {
            log::info!("Opening Linux I2C backend...");

            let bus = fram_linux_i2c::open_linux_i2c(&backend_options(&options)).map_err(|e| {
                format!(
                    "Failed to open Linux I2C device: {}\n\
                     Make sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG i2c $USER",
                    e
                )
            })?;
            let pin = fram_linux_gpio::open_wp_pin(&options)
                .map_err(|e| format!("Failed to set up WP line: {}", e))?;

            let config = common.config(pin.is_some());
            let mut fram = FramDevice::new(bus, pin, config)?;
            commands::run(&mut fram, command)
        }

        _ => Err(unknown_backend_error(name)),
    }
}

fn unknown_backend_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown backend: {}\n\n", name);
    msg.push_str(&backend_help());
    msg.push_str("\nUse 'fram list-backends' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_string() {
        let (name, options) = parse_backend_string("linux_i2c:dev=/dev/i2c-1,addr=0x52");
        assert_eq!(name, "linux_i2c");
        assert_eq!(options, vec![("dev", "/dev/i2c-1"), ("addr", "0x52")]);

        let (name, options) = parse_backend_string("dummy");
        assert_eq!(name, "dummy");
        assert!(options.is_empty());
    }

    #[test]
    fn test_common_options() {
        let common =
            CommonOptions::parse(&[("addr", "0x53"), ("density", "16"), ("wp_init", "on")])
                .unwrap();
        assert_eq!(common.address.get(), 0x53);
        assert_eq!(common.density, Some(Density::K16));
        assert_eq!(common.wp_init, WpStatus::Enabled);

        let config = common.config(false);
        assert!(!config.manage_wp);
        assert_eq!(config.density, Some(Density::K16));

        let config = common.config(true);
        assert!(config.manage_wp);
        assert_eq!(config.initial_wp, WpStatus::Enabled);
    }

    #[test]
    fn test_bad_common_options() {
        assert!(matches!(
            CommonOptions::parse(&[("addr", "0x60")]),
            Err(BackendError::BadAddress(0x60))
        ));
        assert!(matches!(
            CommonOptions::parse(&[("density", "32")]),
            Err(BackendError::BadDensity(32))
        ));
        assert!(CommonOptions::parse(&[("wp_init", "maybe")]).is_err());
    }

    #[test]
    fn test_backend_options_drop_shared_keys() {
        let options = [
            ("dev", "/dev/i2c-1"),
            ("addr", "0x50"),
            ("wp_chip", "/dev/gpiochip0"),
            ("wp", "17"),
        ];
        assert_eq!(backend_options(&options), vec![("dev", "/dev/i2c-1")]);
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_find_dummy() {
        assert_eq!(find_backend("dummy"), Some("dummy"));
        assert_eq!(find_backend("nonexistent"), None);
    }

    #[cfg(feature = "linux-i2c")]
    #[test]
    fn test_find_linux_i2c_alias() {
        assert_eq!(find_backend("i2cdev"), Some("linux_i2c"));
    }
}
