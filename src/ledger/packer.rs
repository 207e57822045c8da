//! Byte packer for the canonical binary encoding.

use bytes::{BufMut, BytesMut};

/// Append-only little-endian writer.
#[derive(Debug, Default, Clone)]
pub struct Packer {
    buf: BytesMut,
}

impl Packer {
    /// Create an empty packer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one byte.
    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.put_u8(v);
        self
    }

    /// Write a `u16`.
    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.put_u16_le(v);
        self
    }

    /// Write a `u32`.
    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.put_u32_le(v);
        self
    }

    /// Write a `u64`.
    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.put_u64_le(v);
        self
    }

    /// Write raw bytes with no length prefix.
    pub fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.buf.put_slice(v);
        self
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing was written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the packer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}
