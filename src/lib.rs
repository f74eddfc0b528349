//! ASCV - Compact binary container for ASCII-art video.
//!
//! An `.ascv` file is a fixed 32-byte header followed by length-prefixed
//! frame records. Frame content is optionally run-length encoded.
//!
//! # Architecture
//!
//! - `codec`: standalone VLQ and RLE byte codecs
//! - `container`: header/frame types, writer and reader
//! - `schema`: JSON configuration for building containers
//!
//! # Example
//!
//! ```rust,no_run
//! use ascv::{
//!     container::{Compression, Frame, read_file, write_file},
//!     schema::VideoConfig,
//! };
//!
//! let config = VideoConfig::default();
//! let frames = vec![
//!     Frame::encode(b"  o  \n /|\\ \n / \\ \n", config.compression),
//!     Frame::encode(b" \\o/ \n  |  \n / \\ \n", config.compression),
//! ];
//! write_file("dance.ascv", &config.header(frames.len() as u32), &frames)?;
//!
//! let (header, frames) = read_file("dance.ascv")?;
//! let compression = header.compression().unwrap_or(Compression::None);
//! for frame in &frames {
//!     println!("{}", String::from_utf8_lossy(&frame.decode(compression)?));
//! }
//! # Ok::<(), ascv::Error>(())
//! ```

pub mod codec;
pub mod container;
mod error;
pub mod schema;

// Re-export commonly used types
pub use container::{Compression, Frame, Header};
pub use error::{Error, Result};
pub use schema::VideoConfig;
