//! Linux i2c-dev bus implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `embedded_hal::i2c::I2c` trait using the kernel's `I2C_RDWR` ioctl, so a
//! whole transaction (with repeated starts) goes out as one combined
//! transfer.

use crate::error::{LinuxI2cError, Result};

use bitflags::bitflags;
use embedded_hal::i2c::{ErrorType, I2c, Operation};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Kernel limit on messages per `I2C_RDWR` call (`I2C_RDWR_IOCTL_MAX_MSGS`)
pub const MAX_MESSAGES: usize = 42;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::{ioctl_read_bad, ioctl_write_ptr_bad};

    const I2C_FUNCS: u16 = 0x0705;
    const I2C_RDWR: u16 = 0x0707;

    /// Kernel `struct i2c_msg`
    #[repr(C)]
    pub struct I2cMsg {
        pub addr: u16,
        pub flags: u16,
        pub len: u16,
        pub buf: *mut u8,
    }

    /// Kernel `struct i2c_rdwr_ioctl_data`
    #[repr(C)]
    pub struct I2cRdwrData {
        pub msgs: *mut I2cMsg,
        pub nmsgs: u32,
    }

    ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);
    ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, I2cRdwrData);
}

bitflags! {
    /// `struct i2c_msg` flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MsgFlags: u16 {
        /// Read data, from slave to master
        const RD = 0x0001;
        /// 10-bit slave address
        const TEN = 0x0010;
        /// Skip the start condition and address (needs `NOSTART`)
        const NOSTART = 0x4000;
    }
}

bitflags! {
    /// Adapter functionality reported by `I2C_FUNCS`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Functionality: u64 {
        /// Plain I2C transfers (`I2C_RDWR`)
        const I2C = 0x0000_0001;
        /// 10-bit addressing
        const TEN_BIT_ADDR = 0x0000_0002;
        /// Protocol mangling flags
        const PROTOCOL_MANGLING = 0x0000_0004;
        /// `NOSTART` message flag
        const NOSTART = 0x0000_0010;
        /// SMBus quick command
        const SMBUS_QUICK = 0x0001_0000;
    }
}

/// Configuration for opening a Linux I2C bus
#[derive(Debug, Clone, Default)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-1")
    pub device: String,
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Create a configuration for bus number `bus`
    pub fn bus(bus: u32) -> Self {
        Self::new(format!("/dev/i2c-{}", bus))
    }
}

/// One kernel message: a run of adjacent operations of the same direction
#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

/// Merge adjacent operations of the same direction
///
/// The bus contract sends adjacent same-direction operations without a
/// restart between them, which the kernel only does within one message.
fn coalesce(operations: &[Operation<'_>]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for op in operations {
        match (op, segments.last_mut()) {
            (Operation::Write(bytes), Some(Segment::Write(buf))) => buf.extend_from_slice(bytes),
            (Operation::Write(bytes), _) => segments.push(Segment::Write(bytes.to_vec())),
            (Operation::Read(buf), Some(Segment::Read(data))) => {
                data.resize(data.len() + buf.len(), 0)
            }
            (Operation::Read(buf), _) => segments.push(Segment::Read(vec![0; buf.len()])),
        }
    }
    segments
}

/// Copy received data back into the caller's read buffers, in order
fn scatter(segments: &[Segment], operations: &mut [Operation<'_>]) {
    let mut received = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Read(data) => Some(data.iter()),
            Segment::Write(_) => None,
        })
        .flatten();
    for op in operations.iter_mut() {
        if let Operation::Read(buf) = op {
            for (dst, src) in buf.iter_mut().zip(&mut received) {
                *dst = *src;
            }
        }
    }
}

/// Linux I2C bus using the i2c-dev interface
pub struct LinuxI2c {
    /// File handle for the i2c-dev device
    file: File,
    /// Device path, for messages
    path: String,
    /// Adapter functionality
    funcs: Functionality,
}

impl LinuxI2c {
    /// Open a Linux I2C bus with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::debug!("linux_i2c: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let mut raw: libc::c_ulong = 0;
        unsafe {
            ioctl::i2c_funcs(file.as_raw_fd(), &mut raw).map_err(|e| {
                LinuxI2cError::FunctionalityFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }
        let funcs = Functionality::from_bits_truncate(raw as u64);
        log::debug!("linux_i2c: Adapter functionality {:?}", funcs);

        if !funcs.contains(Functionality::I2C) {
            return Err(LinuxI2cError::NotSupported(config.device.clone()));
        }

        log::info!("linux_i2c: Opened {}", config.device);

        Ok(Self {
            file,
            path: config.device.clone(),
            funcs,
        })
    }

    /// Open a device with default settings
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxI2cConfig::new(device))
    }

    /// Adapter functionality reported by the kernel
    pub fn functionality(&self) -> Functionality {
        self.funcs
    }

    /// Device path this bus was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    fn rdwr(&mut self, address: u8, segments: &mut [Segment]) -> Result<()> {
        if segments.len() > MAX_MESSAGES {
            return Err(LinuxI2cError::TooManyMessages(segments.len()));
        }

        let mut msgs = Vec::with_capacity(segments.len());
        for segment in segments.iter_mut() {
            let (flags, buf) = match segment {
                Segment::Write(buf) => (MsgFlags::empty(), buf),
                Segment::Read(buf) => (MsgFlags::RD, buf),
            };
            let len =
                u16::try_from(buf.len()).map_err(|_| LinuxI2cError::MessageTooLong(buf.len()))?;
            msgs.push(ioctl::I2cMsg {
                addr: address as u16,
                flags: flags.bits(),
                len,
                buf: buf.as_mut_ptr(),
            });
        }

        let data = ioctl::I2cRdwrData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        };

        log::trace!(
            "linux_i2c: RDWR to 0x{:02X} with {} message(s)",
            address,
            msgs.len()
        );

        unsafe {
            ioctl::i2c_rdwr(self.file.as_raw_fd(), &data).map_err(|e| {
                LinuxI2cError::TransferFailed {
                    addr: address,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }
        Ok(())
    }
}

impl ErrorType for LinuxI2c {
    type Error = LinuxI2cError;
}

impl I2c for LinuxI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> std::result::Result<(), Self::Error> {
        let mut segments = coalesce(operations);
        if segments.is_empty() {
            return Ok(());
        }
        self.rdwr(address, &mut segments)?;
        scatter(&segments, operations);
        Ok(())
    }
}

/// Parse bus options from a list of key-value pairs
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxI2cConfig> {
    let mut config = LinuxI2cConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "bus" => {
                let bus: u32 = value
                    .parse()
                    .map_err(|_| LinuxI2cError::InvalidParameter(format!("bus={}", value)))?;
                config = LinuxI2cConfig::bus(bus);
            }
            _ => {
                log::warn!("linux_i2c: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err(LinuxI2cError::NoDevice);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_adjacent_writes() {
        let header = [0x12, 0x34];
        let data = [0xAA, 0xBB];
        let ops = [Operation::Write(&header), Operation::Write(&data)];
        assert_eq!(
            coalesce(&ops),
            vec![Segment::Write(vec![0x12, 0x34, 0xAA, 0xBB])]
        );
    }

    #[test]
    fn test_write_read_and_scatter() {
        let header = [0x00, 0x10];
        let mut first = [0u8; 2];
        let mut second = [0u8; 1];
        let mut ops = [
            Operation::Write(&header),
            Operation::Read(&mut first),
            Operation::Read(&mut second),
        ];

        let mut segments = coalesce(&ops);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], Segment::Read(vec![0; 3]));

        if let Segment::Read(data) = &mut segments[1] {
            data.copy_from_slice(&[1, 2, 3]);
        }
        scatter(&segments, &mut ops);
        assert_eq!(first, [1, 2]);
        assert_eq!(second, [3]);
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[("dev", "/dev/i2c-3")]).unwrap();
        assert_eq!(config.device, "/dev/i2c-3");

        let config = parse_options(&[("bus", "1")]).unwrap();
        assert_eq!(config.device, "/dev/i2c-1");

        assert!(matches!(parse_options(&[]), Err(LinuxI2cError::NoDevice)));
        assert!(matches!(
            parse_options(&[("bus", "x")]),
            Err(LinuxI2cError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_msg_layout() {
        assert_eq!(
            std::mem::size_of::<ioctl::I2cMsg>(),
            8 + std::mem::size_of::<*mut u8>()
        );
    }
}
