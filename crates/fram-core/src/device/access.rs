//! Raw and typed memory access
//!
//! Every operation is built on two primitives: a framed write (word address
//! header followed by the payload, one transaction) and a pointer write
//! followed by a repeated-start read. Offsets are not checked against the
//! chip size; the chip wraps them itself.

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

use embedded_hal::i2c::{I2c, Operation};

use super::FramDevice;
use crate::error::{Error, Result};

/// Largest transfer issued per transaction by the chunked helpers
pub const CHUNK_SIZE: usize = 256;

impl<I2C: I2c, WP> FramDevice<I2C, WP> {
    fn frame(&self, offset: u16) -> (u8, [u8; 2], usize) {
        self.geometry
            .address_mode
            .frame(self.config.address.get(), offset)
    }

    /// Write `data` starting at `offset` in one transaction
    pub fn write_array(&mut self, offset: u16, data: &[u8]) -> Result<(), I2C::Error> {
        let (addr, header, header_len) = self.frame(offset);
        self.i2c
            .transaction(
                addr,
                &mut [Operation::Write(&header[..header_len]), Operation::Write(data)],
            )
            .map_err(Error::Bus)
    }

    /// Fill `buf` from memory starting at `offset`
    ///
    /// An empty `buf` is rejected with [`Error::ZeroLengthRead`] without
    /// touching the bus.
    pub fn read_array(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), I2C::Error> {
        if buf.is_empty() {
            return Err(Error::ZeroLengthRead);
        }
        let (addr, header, header_len) = self.frame(offset);
        self.i2c
            .write_read(addr, &header[..header_len], buf)
            .map_err(Error::Bus)
    }

    /// Write one byte
    pub fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), I2C::Error> {
        self.write_array(offset, &[value])
    }

    /// Read one byte
    pub fn read_byte(&mut self, offset: u16) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.read_array(offset, &mut buf)?;
        Ok(buf[0])
    }

    /// Write a 16-bit value, big-endian
    pub fn write_word(&mut self, offset: u16, value: u16) -> Result<(), I2C::Error> {
        self.write_array(offset, &value.to_be_bytes())
    }

    /// Read a 16-bit value, big-endian
    pub fn read_word(&mut self, offset: u16) -> Result<u16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.read_array(offset, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write a 32-bit value, big-endian
    pub fn write_long(&mut self, offset: u16, value: u32) -> Result<(), I2C::Error> {
        self.write_array(offset, &value.to_be_bytes())
    }

    /// Read a 32-bit value, big-endian
    pub fn read_long(&mut self, offset: u16) -> Result<u32, I2C::Error> {
        let mut buf = [0u8; 4];
        self.read_array(offset, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Copy the byte at `from` to `to`
    ///
    /// Two independent transactions. If the read fails nothing is written.
    pub fn copy_byte(&mut self, from: u16, to: u16) -> Result<(), I2C::Error> {
        let value = self.read_byte(from)?;
        self.write_byte(to, value)
    }

    /// Read an arbitrarily long range in [`CHUNK_SIZE`] transactions
    pub fn read_into(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), I2C::Error> {
        let mut pos = offset;
        for chunk in buf.chunks_mut(CHUNK_SIZE) {
            self.read_array(pos, chunk)?;
            pos = pos.wrapping_add(chunk.len() as u16);
        }
        Ok(())
    }

    /// Write an arbitrarily long range in [`CHUNK_SIZE`] transactions
    pub fn write_from(&mut self, offset: u16, data: &[u8]) -> Result<(), I2C::Error> {
        let mut pos = offset;
        for chunk in data.chunks(CHUNK_SIZE) {
            self.write_array(pos, chunk)?;
            pos = pos.wrapping_add(chunk.len() as u16);
        }
        Ok(())
    }

    /// Read `length` bytes from `offset` into a new buffer
    #[cfg(feature = "alloc")]
    pub fn read_vec(&mut self, offset: u16, length: usize) -> Result<Vec<u8>, I2C::Error> {
        if length == 0 {
            return Err(Error::ZeroLengthRead);
        }
        let mut buf = vec![0u8; length];
        self.read_into(offset, &mut buf)?;
        Ok(buf)
    }
}
