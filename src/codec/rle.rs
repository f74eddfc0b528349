//! Byte-oriented run-length encoding for frame payloads.
//!
//! An encoded stream is a sequence of `(count, byte)` pairs. Runs longer
//! than 255 bytes are split across several pairs.

use crate::error::{Error, Result};

/// Longest run a single pair can describe.
pub const MAX_RUN: usize = u8::MAX as usize;

/// Compress `data` into `(count, byte)` pairs.
///
/// Every input has an encoding; the empty slice encodes to an empty vector.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let byte = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == byte)
            .count();
        out.push(run as u8);
        out.push(byte);
        i += run;
    }
    out
}

/// Expand `(count, byte)` pairs back into the original bytes.
///
/// Fails with [`Error::MalformedData`] if `data` has odd length.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(decoded_len(data)?);
    for pair in data.chunks_exact(2) {
        let (count, byte) = (pair[0] as usize, pair[1]);
        out.resize(out.len() + count, byte);
    }
    Ok(out)
}

/// Size of the output [`decode`] would produce, without expanding it.
pub fn decoded_len(data: &[u8]) -> Result<usize> {
    if data.len() % 2 != 0 {
        return Err(Error::MalformedData { len: data.len() });
    }
    Ok(data.chunks_exact(2).map(|pair| pair[0] as usize).sum())
}
