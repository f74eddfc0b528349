//! Reading and writing `.ascv` ASCII-art video containers.
//!
//! # File Format
//!
//! ```text
//! Header (32 bytes, little-endian, no padding):
//!   Magic: "AAVF" (4 bytes)
//!   Version: u8
//!   Width: u16
//!   Height: u16
//!   FPS: u8
//!   Frame count: u32 (advisory)
//!   Compression: u8 (0 = raw, 1 = RLE)
//!   Charset: u8
//!   Reserved: 16 bytes
//!
//! Frame records (repeated until end of input):
//!   Length: VLQ (1-5 bytes)
//!   Content: `length` bytes, RLE pairs when compression is 1
//! ```

mod format;
mod reader;
mod writer;

pub use format::{Compression, FORMAT_VERSION, Frame, Header, MAGIC};
pub use reader::{
    ContainerReader, FrameIterator, LengthPrefixPolicy, ReadOptions, read_container,
    read_container_with, read_file,
};
pub use writer::{ContainerStats, ContainerWriter, write_container, write_file};
