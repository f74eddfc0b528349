//! Configuration types describing a container to build.

use serde::{Deserialize, Serialize};

use crate::container::{Compression, FORMAT_VERSION, Header, MAGIC};

fn default_version() -> u8 {
    FORMAT_VERSION
}

fn default_fps() -> u8 {
    24
}

fn default_compression() -> Compression {
    Compression::Rle
}

/// Parameters of an ASCII-art video, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Format version stored in the header.
    #[serde(default = "default_version")]
    pub version: u8,
    /// Character columns per frame.
    pub width: u16,
    /// Character rows per frame.
    pub height: u16,
    /// Playback rate.
    #[serde(default = "default_fps")]
    pub fps: u8,
    /// Compression applied to frame content.
    #[serde(default = "default_compression")]
    pub compression: Compression,
    /// Opaque charset identifier.
    #[serde(default)]
    pub charset: u8,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            width: 80,
            height: 24,
            fps: default_fps(),
            compression: default_compression(),
            charset: 0,
        }
    }
}

impl VideoConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }

    /// Build the header for a container holding `frame_count` frames.
    pub fn header(&self, frame_count: u32) -> Header {
        Header {
            magic: *MAGIC,
            version: self.version,
            width: self.width,
            height: self.height,
            fps: self.fps,
            frames: frame_count,
            compression: self.compression.as_u8(),
            charset: self.charset,
            reserved: [0u8; 16],
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Frame dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Frame rate must be non-zero")]
    InvalidFrameRate,
}
