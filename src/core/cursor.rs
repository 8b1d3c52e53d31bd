//! Sequential binary cursor over byte buffers.
//!
//! [`Reader`] walks a borrowed slice with an internal offset and fails with
//! [`QueryError::Underrun`] when a read runs past the end. [`Writer`] appends
//! into a `BytesMut`; the wire image is strictly the order of write calls.
//!
//! The only non-trivial primitives are the protocol's C-style string (UTF-8
//! bytes terminated by a single zero byte, no length prefix) and the
//! little-endian short used for the basic-stat host port. Everything else on
//! the wire is big-endian.

use crate::error::{QueryError, Result};
use bytes::{Bytes, BytesMut};

/// Read cursor over a borrowed byte slice.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Current read offset from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The unconsumed tail of the buffer, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }

    /// Consume and return the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(QueryError::Underrun {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Big-endian signed 32-bit integer (session ids, challenge tokens).
    pub fn read_i32_be(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Little-endian unsigned short (the basic-stat host port).
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a null-terminated string, consuming the terminator.
    ///
    /// The returned string excludes the zero byte. Fails with `Underrun` if
    /// the buffer ends before a terminator is found. Non-UTF-8 bytes are
    /// replaced rather than rejected; stat payloads are hostile input.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = self.rest();
        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                let s = String::from_utf8_lossy(&rest[..nul]).into_owned();
                self.offset += nul + 1;
                Ok(s)
            }
            None => Err(QueryError::Underrun {
                needed: rest.len() + 1,
                remaining: rest.len(),
            }),
        }
    }
}

/// Append-only write cursor.
#[derive(Debug, Default)]
pub struct Writer {
    buf: BytesMut,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.extend_from_slice(&[value]);
    }

    pub fn write_i32_be(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write the UTF-8 bytes of `value` followed by exactly one zero byte.
    ///
    /// Caller contract: `value` must not itself contain a NUL, or the result
    /// is ambiguous on decode. Not enforced, matching the wire producers.
    pub fn write_cstring(&mut self, value: &str) {
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(&[0]);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Materialize the accumulated bytes as the final wire image.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
