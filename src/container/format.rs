//! Binary format definitions for ASCV containers.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::codec::rle;
use crate::error::{Error, Result};

/// Magic bytes identifying an ASCV container.
pub const MAGIC: &[u8; 4] = b"AAVF";

/// Format version written by default.
pub const FORMAT_VERSION: u8 = 1;

/// Compression applied to frame payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Compression {
    /// Frame content stored verbatim.
    #[default]
    None = 0,
    /// Frame content stored as RLE `(count, byte)` pairs.
    Rle = 1,
}

impl Compression {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Compression::None),
            1 => Some(Compression::Rle),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Fixed 32-byte container header.
///
/// Fields are stored little-endian in declaration order with no padding.
/// Only the magic is checked on read; every other field round-trips as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format tag, `AAVF` for every header that reads back successfully.
    pub magic: [u8; 4],
    /// Format version (informational).
    pub version: u8,
    /// Character columns per frame.
    pub width: u16,
    /// Character rows per frame.
    pub height: u16,
    /// Playback rate in frames per second.
    pub fps: u8,
    /// Declared frame count. Advisory: never checked against the stream.
    pub frames: u32,
    /// Raw compression flag, see [`Header::compression`].
    pub compression: u8,
    /// Opaque charset identifier.
    pub charset: u8,
    /// Preserved byte-for-byte.
    pub reserved: [u8; 16],
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: *MAGIC,
            version: FORMAT_VERSION,
            width: 0,
            height: 0,
            fps: 0,
            frames: 0,
            compression: Compression::None.as_u8(),
            charset: 0,
            reserved: [0u8; 16],
        }
    }
}

impl Header {
    /// Size of header in bytes.
    /// Magic(4) + Version(1) + Width(2) + Height(2) + Fps(1) + Frames(4) +
    /// Compression(1) + Charset(1) + Reserved(16) = 32
    pub const SIZE: usize = 32;

    /// Typed view of the compression flag, `None` for unknown values.
    pub fn compression(&self) -> Option<Compression> {
        Compression::from_u8(self.compression)
    }

    /// Serialize to the fixed 32-byte record.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.magic);
        buf[4] = self.version;
        buf[5..7].copy_from_slice(&self.width.to_le_bytes());
        buf[7..9].copy_from_slice(&self.height.to_le_bytes());
        buf[9] = self.fps;
        buf[10..14].copy_from_slice(&self.frames.to_le_bytes());
        buf[14] = self.compression;
        buf[15] = self.charset;
        buf[16..32].copy_from_slice(&self.reserved);
        buf
    }

    /// Parse a 32-byte record, rejecting anything without the `AAVF` tag.
    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Result<Self> {
        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if &magic != MAGIC {
            return Err(Error::InvalidFormat { found: magic });
        }

        let mut reserved = [0u8; 16];
        reserved.copy_from_slice(&buf[16..32]);

        Ok(Self {
            magic,
            version: buf[4],
            width: u16::from_le_bytes([buf[5], buf[6]]),
            height: u16::from_le_bytes([buf[7], buf[8]]),
            fps: buf[9],
            frames: u32::from_le_bytes([buf[10], buf[11], buf[12], buf[13]]),
            compression: buf[14],
            charset: buf[15],
            reserved,
        })
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        r.read_exact(&mut buf)?;
        Self::from_bytes(&buf)
    }
}

/// One frame of stored content.
///
/// The stored length is always the length of the owned buffer, so the
/// prefix written for a frame matches the bytes that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    content: Vec<u8>,
}

impl Frame {
    /// Wrap content exactly as it will be stored.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Build a frame from raw text, compressing it when `compression` is RLE.
    pub fn encode(raw: &[u8], compression: Compression) -> Self {
        match compression {
            Compression::None => Self::new(raw),
            Compression::Rle => Self::new(rle::encode(raw)),
        }
    }

    /// Recover raw text from stored content.
    pub fn decode(&self, compression: Compression) -> Result<Vec<u8>> {
        match compression {
            Compression::None => Ok(self.content.clone()),
            Compression::Rle => rle::decode(&self.content),
        }
    }

    /// Stored size in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Get stored content bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Take ownership of the stored content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}
