//! Bounds-checked read head over an immutable byte buffer.
//!
//! Every primitive read returns `Option`: `Some` on success, `None` when
//! fewer bytes remain than the read requires. The position never moves
//! backwards and a failed read consumes nothing, so callers can translate
//! `None` directly into a truncation condition without rewinding.

use byteorder::{ByteOrder, LittleEndian};

/// Read cursor over a byte slice. Owned exclusively by one decode call.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Current byte offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Option<u8> {
        let b = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// Read a little-endian 32-bit signed integer.
    pub fn read_i32(&mut self) -> Option<i32> {
        let end = self.pos.checked_add(4)?;
        if end > self.buf.len() {
            return None;
        }
        let v = LittleEndian::read_i32(&self.buf[self.pos..end]);
        self.pos = end;
        Some(v)
    }

    /// Read exactly `len` bytes, or `None` if fewer remain.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end > self.buf.len() {
            return None;
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    /// Look at up to `len` upcoming bytes without consuming them.
    pub fn peek(&self, len: usize) -> &'a [u8] {
        let end = (self.pos + len).min(self.buf.len());
        &self.buf[self.pos..end]
    }
}
