//! # Canonical Byte Codec
//!
//! Big-endian fixed-width integers, fixed-width identifiers and `u32`
//! length-prefixed byte strings. Every warp structure is written with
//! `Packer` and read back with `Unpacker`; readers must call
//! [`Unpacker::finish`] so trailing bytes are rejected.

use super::errors::CodecError;

/// Version prefix of every unsigned message.
pub const CODEC_VERSION: u16 = 0;

/// Upper bound on any length-prefixed field and on a whole message.
pub const MAX_MESSAGE_SIZE: usize = 256 * 1024;

/// Append-only writer.
#[derive(Debug, Default)]
pub struct Packer {
    bytes: Vec<u8>,
}

impl Packer {
    /// Writer with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Write one byte.
    pub fn pack_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Write a big-endian `u16`.
    pub fn pack_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian `u32`.
    pub fn pack_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a big-endian `u64`.
    pub fn pack_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Write raw bytes with no length prefix.
    pub fn pack_fixed(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Write a `u32` length prefix followed by the bytes.
    ///
    /// Callers bound `bytes` by [`MAX_MESSAGE_SIZE`] at construction.
    pub fn pack_bytes(&mut self, bytes: &[u8]) {
        self.pack_u32(bytes.len() as u32);
        self.bytes.extend_from_slice(bytes);
    }

    /// Consume the writer.
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Cursor over untrusted input.
#[derive(Debug)]
pub struct Unpacker<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Unpacker<'a> {
    /// Start reading at offset zero.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current read offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Unread byte count.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], CodecError> {
        let available = self.remaining();
        if needed > available {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed,
                available,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(slice)
    }

    /// Read one byte.
    pub fn unpack_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian `u16`.
    pub fn unpack_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.unpack_fixed()?))
    }

    /// Read a big-endian `u32`.
    pub fn unpack_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.unpack_fixed()?))
    }

    /// Read a big-endian `u64`.
    pub fn unpack_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.unpack_fixed()?))
    }

    /// Read exactly `N` bytes.
    pub fn unpack_fixed<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a `u32` length prefix and that many bytes.
    pub fn unpack_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let declared = self.unpack_u32()? as usize;
        if declared > MAX_MESSAGE_SIZE {
            return Err(CodecError::LengthTooLarge {
                declared,
                max: MAX_MESSAGE_SIZE,
            });
        }
        Ok(self.take(declared)?.to_vec())
    }

    /// Require that the input is fully consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(CodecError::TrailingBytes { remaining }),
        }
    }
}

/// Reject byte strings longer than [`MAX_MESSAGE_SIZE`].
pub fn check_size(len: usize) -> Result<(), CodecError> {
    if len > MAX_MESSAGE_SIZE {
        return Err(CodecError::LengthTooLarge {
            declared: len,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(())
}
