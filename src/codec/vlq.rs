//! Variable-length quantity encoding for frame length prefixes.
//!
//! Each byte carries 7 bits of the value, least-significant group first.
//! The high bit is set on every byte except the last one.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};

/// Continuation flag on every byte but the last.
const CONTINUATION: u8 = 0x80;

/// Payload bits per encoded byte.
const GROUP_MASK: u8 = 0x7F;

/// Longest encoding of a `u32` (5 * 7 = 35 bits).
pub const MAX_ENCODED_LEN: usize = 5;

/// Encode `value` into `buf`, returning the number of bytes used.
fn encode_to_array(mut value: u32, buf: &mut [u8; MAX_ENCODED_LEN]) -> usize {
    let mut len = 0;
    loop {
        let group = (value & u32::from(GROUP_MASK)) as u8;
        value >>= 7;
        if value == 0 {
            buf[len] = group;
            return len + 1;
        }
        buf[len] = group | CONTINUATION;
        len += 1;
    }
}

/// Encode a value as a VLQ byte sequence (1 to 5 bytes).
pub fn encode(value: u32) -> Vec<u8> {
    let mut buf = [0u8; MAX_ENCODED_LEN];
    let len = encode_to_array(value, &mut buf);
    buf[..len].to_vec()
}

/// Number of bytes [`encode`] emits for `value`.
pub fn encoded_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Write the VLQ encoding of `value`, returning the number of bytes written.
pub fn write_to<W: Write>(w: &mut W, value: u32) -> io::Result<usize> {
    let mut buf = [0u8; MAX_ENCODED_LEN];
    let len = encode_to_array(value, &mut buf);
    w.write_all(&buf[..len])?;
    Ok(len)
}

/// Incremental decoder fed one byte at a time.
///
/// Lets callers tell apart a source that ends before the first byte of a
/// value from one that ends partway through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    value: u32,
    shift: u32,
    consumed: usize,
    overflowed: bool,
}

impl Decoder {
    /// Create a decoder positioned at the start of a value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next byte.
    ///
    /// Returns `Some(value)` once a byte with the high bit clear completes
    /// the value. Groups beyond bit 31 are dropped, see [`Decoder::overflowed`].
    pub fn push(&mut self, byte: u8) -> Option<u32> {
        let group = u32::from(byte & GROUP_MASK);
        let lost = match 32u32.checked_sub(self.shift) {
            Some(room) if room >= 7 => false,
            Some(room) => group >> room != 0,
            None => group != 0,
        };
        self.overflowed |= lost;

        self.value |= group.checked_shl(self.shift).unwrap_or(0);
        self.consumed += 1;

        if byte & CONTINUATION == 0 {
            return Some(self.value);
        }
        self.shift = self.shift.saturating_add(7);
        None
    }

    /// True if any set bit fell outside the 32-bit value.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Bytes fed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// True once at least one byte of a value has been fed.
    pub fn in_progress(&self) -> bool {
        self.consumed > 0
    }
}

/// Decode one value from a reader.
///
/// Returns the value and the number of bytes consumed. Any number of
/// continuation bytes is accepted; bits above 31 are dropped. Fails with
/// [`Error::EndOfInput`] if the source ends before the terminating byte.
pub fn decode<R: Read>(r: &mut R) -> Result<(u32, usize)> {
    let mut decoder = Decoder::new();
    let mut byte = [0u8; 1];
    loop {
        r.read_exact(&mut byte)?;
        if let Some(value) = decoder.push(byte[0]) {
            return Ok((value, decoder.consumed()));
        }
    }
}

/// Decode one value from the start of a byte slice.
pub fn decode_slice(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut decoder = Decoder::new();
    for &byte in bytes {
        if let Some(value) = decoder.push(byte) {
            return Ok((value, decoder.consumed()));
        }
    }
    Err(Error::EndOfInput)
}
