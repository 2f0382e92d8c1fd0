//! fram-dummy - In-memory FRAM emulator for testing
//!
//! This crate provides a dummy I2C bus with one emulated MB85RC chip on it,
//! plus a dummy write-protect pin. It's useful for testing and development
//! without real hardware.
//!
//! The emulator follows the chip's wire behavior: a word address header
//! (one or two bytes) loads the internal address latch, data bytes are
//! stored at the latch which then increments and wraps at the end of the
//! array, and reads continue from the latch. The reserved device ID address
//! answers with the configured ID when the chip's own address is written
//! to it first.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::rc::Rc;
#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use core::cell::Cell;

use embedded_hal::digital;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use fram_core::chip::{manufacturer, AddressMode, Density, DeviceId, DEVICE_ID_ADDRESS};

/// Configuration for the dummy chip
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// 7-bit bus address (base address for one-byte parts)
    pub address: u8,
    /// Answer to the device ID sequence, `None` for parts without one
    pub id: Option<DeviceId>,
    /// Memory size in bytes
    pub size: usize,
    /// Word address framing
    pub address_mode: AddressMode,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self::mb85rc256v()
    }
}

impl DummyConfig {
    fn fujitsu(product: u16, size: usize) -> Self {
        Self {
            address: 0x50,
            id: Some(DeviceId {
                manufacturer: manufacturer::FUJITSU,
                product,
                density_code: product >> 8,
            }),
            size,
            address_mode: AddressMode::TwoByte,
        }
    }

    /// MB85RC64TA, 64 Kbit
    pub fn mb85rc64ta() -> Self {
        Self::fujitsu(0x358, 8192)
    }

    /// MB85RC256V, 256 Kbit
    pub fn mb85rc256v() -> Self {
        Self::fujitsu(0x510, 32768)
    }

    /// MB85RC512T, 512 Kbit
    pub fn mb85rc512t() -> Self {
        Self::fujitsu(0x658, 65536)
    }

    /// Lower half of an MB85RC1MT, 1 Mbit
    pub fn mb85rc1mt() -> Self {
        Self::fujitsu(0x758, 65536)
    }

    /// A part without device ID support, sized and framed for `density`
    pub fn without_id(density: Density) -> Self {
        let geometry = density.geometry();
        Self {
            address: 0x50,
            id: None,
            size: geometry.max_address as usize,
            address_mode: geometry.address_mode,
        }
    }

    /// Answer the device ID sequence with these raw bytes
    pub fn with_raw_id(mut self, raw: [u8; 3]) -> Self {
        self.id = Some(DeviceId::from_raw(raw));
        self
    }

    /// Place the chip at another bus address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
}

/// Observer for a [`DummyPin`]'s level, usable after the pin is moved away
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default)]
pub struct PinProbe(Rc<Cell<Option<bool>>>);

#[cfg(feature = "alloc")]
impl PinProbe {
    /// Last driven level, `None` if never driven
    pub fn level(&self) -> Option<bool> {
        self.0.get()
    }

    /// Whether the pin is currently driven high
    pub fn is_high(&self) -> bool {
        self.0.get() == Some(true)
    }
}

/// Dummy GPIO output used as write-protect pin
#[cfg(feature = "alloc")]
#[derive(Debug, Default)]
pub struct DummyPin {
    probe: PinProbe,
    broken: bool,
}

#[cfg(feature = "alloc")]
impl DummyPin {
    /// Create a pin that has never been driven
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pin whose every drive attempt fails
    pub fn broken() -> Self {
        Self {
            probe: PinProbe::default(),
            broken: true,
        }
    }

    /// Get an observer for this pin's level
    pub fn probe(&self) -> PinProbe {
        self.probe.clone()
    }

    fn drive(&mut self, high: bool) -> Result<(), digital::ErrorKind> {
        if self.broken {
            return Err(digital::ErrorKind::Other);
        }
        self.probe.0.set(Some(high));
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl digital::ErrorType for DummyPin {
    type Error = digital::ErrorKind;
}

#[cfg(feature = "alloc")]
impl digital::OutputPin for DummyPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Dummy I2C bus with one emulated FRAM chip
#[cfg(feature = "alloc")]
pub struct DummyFram {
    config: DummyConfig,
    data: Vec<u8>,
    latch: usize,
    transactions: usize,
    offline: bool,
    fail_write_at: Option<usize>,
    wp: Option<PinProbe>,
}

#[cfg(feature = "alloc")]
impl DummyFram {
    /// Create a new dummy chip with the given configuration, zero-filled
    pub fn new(config: DummyConfig) -> Self {
        let data = vec![0x00; config.size];
        Self {
            config,
            data,
            latch: 0,
            transactions: 0,
            offline: false,
            fail_write_at: None,
            wp: None,
        }
    }

    /// Create a new dummy chip with default configuration (MB85RC256V)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy chip with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut fram = Self::new(config);
        let len = core::cmp::min(initial_data.len(), fram.data.len());
        fram.data[..len].copy_from_slice(&initial_data[..len]);
        fram
    }

    /// Get a reference to the memory array
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the memory array
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Number of bus transactions seen so far
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Reset the transaction counter
    pub fn reset_transactions(&mut self) {
        self.transactions = 0;
    }

    /// Make every transaction fail with an address NACK
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// NACK the data byte that would be stored at `offset`
    pub fn fail_write_at(&mut self, offset: Option<usize>) {
        self.fail_write_at = offset;
    }

    /// Honour a write-protect line: while it is high, writes are ignored
    pub fn attach_wp(&mut self, probe: PinProbe) {
        self.wp = Some(probe);
    }

    fn write_protected(&self) -> bool {
        self.wp.as_ref().is_some_and(PinProbe::is_high)
    }

    fn header_len(&self) -> usize {
        match self.config.address_mode {
            AddressMode::TwoByte => 2,
            AddressMode::OneByte { .. } => 1,
        }
    }

    /// Page bits carried by `address`, or `None` if the chip does not answer
    fn match_address(&self, address: u8) -> Option<u8> {
        match self.config.address_mode {
            AddressMode::TwoByte => (address == self.config.address).then_some(0),
            AddressMode::OneByte { page_bits } => {
                let mask = (1u8 << page_bits) - 1;
                (address & !mask == self.config.address & !mask).then_some(address & mask)
            }
        }
    }

    fn decode_offset(&self, page: u8, header: &[u8]) -> usize {
        let offset = match self.config.address_mode {
            AddressMode::TwoByte => ((header[0] as usize) << 8) | header[1] as usize,
            AddressMode::OneByte { .. } => ((page as usize) << 8) | header[0] as usize,
        };
        offset % self.data.len()
    }

    fn handle_device_id(&mut self, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        let id = self
            .config
            .id
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;
        let raw = id.to_raw();
        let mut selected = false;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    selected = bytes.first().map(|b| b >> 1) == Some(self.config.address);
                }
                Operation::Read(buf) => {
                    if !selected {
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                    }
                    for (i, byte) in buf.iter_mut().enumerate() {
                        *byte = raw.get(i).copied().unwrap_or(0xFF);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_memory(&mut self, page: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        let header_len = self.header_len();
        let mut header = [0u8; 2];
        let mut received = 0usize;
        let protected = self.write_protected();
        let size = self.data.len();

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        if received < header_len {
                            header[received] = byte;
                            received += 1;
                            if received == header_len {
                                self.latch = self.decode_offset(page, &header[..header_len]);
                            }
                            continue;
                        }
                        if self.fail_write_at == Some(self.latch) {
                            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                        }
                        if !protected {
                            self.data[self.latch] = byte;
                        }
                        self.latch = (self.latch + 1) % size;
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.data[self.latch];
                        self.latch = (self.latch + 1) % size;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl ErrorType for DummyFram {
    type Error = ErrorKind;
}

#[cfg(feature = "alloc")]
impl I2c for DummyFram {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        log::trace!(
            "dummy: transaction #{} at 0x{:02X}, {} operation(s)",
            self.transactions,
            address,
            operations.len()
        );

        if self.offline {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        if address == DEVICE_ID_ADDRESS {
            return self.handle_device_id(operations);
        }

        let page = self
            .match_address(address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;
        self.handle_memory(page, operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::OutputPin;
    use fram_core::chip;

    #[test]
    fn test_read_device_id() {
        let mut fram = DummyFram::new_default();
        let id = chip::read_device_id(&mut fram, 0x50).unwrap();
        assert_eq!(id.manufacturer, manufacturer::FUJITSU);
        assert_eq!(id.product, 0x510);
        assert_eq!(id.density_code, 5);
    }

    #[test]
    fn test_device_id_needs_own_address() {
        let mut fram = DummyFram::new_default();
        let err = chip::read_device_id(&mut fram, 0x51).unwrap_err();
        assert_eq!(err, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
    }

    #[test]
    fn test_device_id_unsupported() {
        let mut fram = DummyFram::new(DummyConfig::without_id(Density::K16));
        let err = chip::read_device_id(&mut fram, 0x50).unwrap_err();
        assert_eq!(err, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    #[test]
    fn test_read_write() {
        let mut fram = DummyFram::new_default();

        fram.write(0x50, &[0x10, 0x00, 0x12, 0x34, 0x56, 0x78]).unwrap();

        let mut buf = [0u8; 4];
        fram.write_read(0x50, &[0x10, 0x00], &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(&fram.data()[0x1000..0x1004], &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_split_write_operations_are_one_stream() {
        let mut fram = DummyFram::new_default();
        fram.transaction(
            0x50,
            &mut [Operation::Write(&[0x00]), Operation::Write(&[0x20, 0xAA])],
        )
        .unwrap();
        assert_eq!(fram.data()[0x20], 0xAA);
        assert_eq!(fram.transactions(), 1);
    }

    #[test]
    fn test_latch_wraps() {
        let mut fram = DummyFram::new_default();
        fram.write(0x50, &[0x7F, 0xFF, 0x01, 0x02]).unwrap();
        assert_eq!(fram.data()[0x7FFF], 0x01);
        assert_eq!(fram.data()[0x0000], 0x02);
    }

    #[test]
    fn test_one_byte_addressing() {
        let mut fram = DummyFram::new(DummyConfig::without_id(Density::K16));
        // Page 5 via the device address, offset 0x42 in the header
        fram.write(0x55, &[0x42, 0x99]).unwrap();
        assert_eq!(fram.data()[0x542], 0x99);
        assert!(fram.write(0x58, &[0x00, 0x00]).is_err());
    }

    #[test]
    fn test_wrong_address_nacks() {
        let mut fram = DummyFram::new_default();
        let err = fram.write(0x51, &[0x00, 0x00, 0x01]).unwrap_err();
        assert_eq!(err, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    #[test]
    fn test_fail_write_at() {
        let mut fram = DummyFram::new_default();
        fram.fail_write_at(Some(0x11));
        let err = fram.write(0x50, &[0x00, 0x10, 0xAA, 0xBB, 0xCC]).unwrap_err();
        assert_eq!(err, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        assert_eq!(fram.data()[0x10], 0xAA);
        assert_eq!(fram.data()[0x11], 0x00);
        assert_eq!(fram.data()[0x12], 0x00);
    }

    #[test]
    fn test_write_protect_ignores_writes() {
        let mut pin = DummyPin::new();
        let mut fram = DummyFram::new_default();
        fram.attach_wp(pin.probe());

        pin.set_high().unwrap();
        fram.write(0x50, &[0x00, 0x00, 0xAB]).unwrap();
        assert_eq!(fram.data()[0], 0x00);

        pin.set_low().unwrap();
        fram.write(0x50, &[0x00, 0x00, 0xAB]).unwrap();
        assert_eq!(fram.data()[0], 0xAB);
    }

    #[test]
    fn test_offline() {
        let mut fram = DummyFram::new_default();
        fram.set_offline(true);
        assert!(fram.write(0x50, &[0x00, 0x00]).is_err());
        assert_eq!(fram.transactions(), 1);
    }
}
