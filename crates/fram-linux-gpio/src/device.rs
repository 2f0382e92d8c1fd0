//! Linux GPIO write-protect line
//!
//! This module provides the `LinuxGpioPin` struct that implements
//! `embedded_hal::digital::OutputPin` on one line of a GPIO character
//! device. The line is requested as an output when the pin is opened, so
//! the driver only ever drives it.

use crate::error::{LinuxGpioError, Result};

use embedded_hal::digital::{ErrorType, OutputPin};
use fram_core::WpStatus;
use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

/// Consumer label shown by `gpioinfo`
const CONSUMER: &str = "fram-wp";

/// Configuration for opening a WP line
#[derive(Debug, Clone, Default)]
pub struct LinuxGpioConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// Line offset on the chip
    pub line: Offset,
    /// Level to drive as soon as the line is requested
    pub initial: WpStatus,
}

impl LinuxGpioConfig {
    /// Create a new configuration with the given device path and line
    pub fn new(device: impl Into<String>, line: Offset) -> Self {
        Self {
            device: device.into(),
            line,
            initial: WpStatus::Disabled,
        }
    }

    /// Set the level driven at request time
    pub fn with_initial(mut self, initial: WpStatus) -> Self {
        self.initial = initial;
        self
    }
}

fn level(status: WpStatus) -> Value {
    if status.is_enabled() {
        Value::Active
    } else {
        Value::Inactive
    }
}

/// WP line on a Linux GPIO chip
pub struct LinuxGpioPin {
    /// GPIO line request handle
    request: Request,
    /// Requested line offset
    line: Offset,
}

impl LinuxGpioPin {
    /// Request the line as an output
    pub fn open(config: &LinuxGpioConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }

        log::debug!(
            "linux_gpio: Requesting line {} on {}",
            config.line,
            config.device
        );

        let mut req_config = Config::default();
        req_config
            .with_line(config.line)
            .as_output(level(config.initial));

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer(CONSUMER)
            .request()
            .map_err(|e| LinuxGpioError::LineRequestFailed {
                path: config.device.clone(),
                line: config.line,
                source: e,
            })?;

        log::info!(
            "linux_gpio: WP on {} line {} (initially {})",
            config.device,
            config.line,
            config.initial
        );

        Ok(Self {
            request,
            line: config.line,
        })
    }

    /// Line offset this pin drives
    pub fn line(&self) -> Offset {
        self.line
    }

    fn drive(&mut self, status: WpStatus) -> Result<()> {
        self.request
            .set_value(self.line, level(status))
            .map(|_| ())
            .map_err(LinuxGpioError::SetValueFailed)
    }
}

impl ErrorType for LinuxGpioPin {
    type Error = LinuxGpioError;
}

impl OutputPin for LinuxGpioPin {
    fn set_low(&mut self) -> std::result::Result<(), Self::Error> {
        self.drive(WpStatus::Disabled)
    }

    fn set_high(&mut self) -> std::result::Result<(), Self::Error> {
        self.drive(WpStatus::Enabled)
    }
}

/// Parse WP line options from a list of key-value pairs
///
/// Returns `Ok(None)` when no WP option is present at all.
pub fn parse_options(options: &[(&str, &str)]) -> Result<Option<LinuxGpioConfig>> {
    let mut device: Option<String> = None;
    let mut line: Option<Offset> = None;
    let mut initial = WpStatus::Disabled;

    for (key, value) in options {
        match *key {
            "wp_chip" => {
                device = Some(value.to_string());
            }
            "wp_gpiochip" => {
                let chip: u32 = value
                    .parse()
                    .map_err(|_| {
                        LinuxGpioError::InvalidParameter(format!("wp_gpiochip={}", value))
                    })?;
                device = Some(format!("/dev/gpiochip{}", chip));
            }
            "wp" => {
                line = Some(
                    value
                        .parse()
                        .map_err(|_| LinuxGpioError::InvalidParameter(format!("wp={}", value)))?,
                );
            }
            "wp_init" => {
                initial = match *value {
                    "on" | "1" | "enabled" => WpStatus::Enabled,
                    "off" | "0" | "disabled" => WpStatus::Disabled,
                    _ => {
                        return Err(LinuxGpioError::InvalidParameter(format!(
                            "wp_init={} (use on/off)",
                            value
                        )))
                    }
                };
            }
            _ => {}
        }
    }

    match (device, line) {
        (None, None) => Ok(None),
        (Some(device), Some(line)) => {
            Ok(Some(LinuxGpioConfig::new(device, line).with_initial(initial)))
        }
        (Some(_), None) => Err(LinuxGpioError::NoLine),
        (None, Some(_)) => Err(LinuxGpioError::NoDevice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_wp_options() {
        assert!(parse_options(&[("dev", "/dev/i2c-1")]).unwrap().is_none());
    }

    #[test]
    fn test_wp_options() {
        let config = parse_options(&[("wp_chip", "/dev/gpiochip0"), ("wp", "17")])
            .unwrap()
            .unwrap();
        assert_eq!(config.device, "/dev/gpiochip0");
        assert_eq!(config.line, 17);
        assert_eq!(config.initial, WpStatus::Disabled);

        let config = parse_options(&[("wp_gpiochip", "2"), ("wp", "4"), ("wp_init", "on")])
            .unwrap()
            .unwrap();
        assert_eq!(config.device, "/dev/gpiochip2");
        assert_eq!(config.initial, WpStatus::Enabled);
    }

    #[test]
    fn test_incomplete_wp_options() {
        assert!(matches!(
            parse_options(&[("wp", "17")]),
            Err(LinuxGpioError::NoDevice)
        ));
        assert!(matches!(
            parse_options(&[("wp_chip", "/dev/gpiochip0")]),
            Err(LinuxGpioError::NoLine)
        ));
        assert!(matches!(
            parse_options(&[("wp_chip", "/dev/gpiochip0"), ("wp", "x")]),
            Err(LinuxGpioError::InvalidParameter(_))
        ));
        assert!(matches!(
            parse_options(&[
                ("wp_chip", "/dev/gpiochip0"),
                ("wp", "1"),
                ("wp_init", "maybe")
            ]),
            Err(LinuxGpioError::InvalidParameter(_))
        ));
    }
}
