//! Container writer for serializing a header and its frames.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, trace};

use super::format::{Frame, Header};
use crate::codec::vlq;
use crate::error::{Error, Result};

/// Writer that streams a container to any byte sink.
///
/// The header goes out on construction; each frame is appended as a VLQ
/// length followed by its content. Content is written verbatim, so callers
/// compress it beforehand when the header advertises RLE.
///
/// Usage:
/// ```ignore
/// let mut writer = ContainerWriter::new(file, header)?;
/// for text in frames {
///     writer.write_frame(&Frame::encode(text, Compression::Rle))?;
/// }
/// let stats = writer.finish()?;
/// ```
pub struct ContainerWriter<W: Write> {
    writer: W,
    header: Header,
    frames_written: u64,
    payload_bytes: u64,
    bytes_written: u64,
}

impl<W: Write> ContainerWriter<W> {
    /// Write the header and return a writer positioned at the first frame.
    pub fn new(mut writer: W, header: Header) -> Result<Self> {
        header.write_to(&mut writer)?;
        debug!(
            "Wrote ASCV header: {}x{} @ {} fps, {} frames declared, compression {}",
            header.width, header.height, header.fps, header.frames, header.compression
        );

        Ok(Self {
            writer,
            header,
            frames_written: 0,
            payload_bytes: 0,
            bytes_written: Header::SIZE as u64,
        })
    }

    /// Append one frame record.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let size = u32::try_from(frame.size())
            .map_err(|_| Error::FrameTooLarge { size: frame.size() })?;

        let prefix_len = vlq::write_to(&mut self.writer, size)?;
        self.writer.write_all(frame.content())?;

        trace!(
            "Frame {}: {} bytes (+{} byte prefix)",
            self.frames_written, size, prefix_len
        );

        self.frames_written += 1;
        self.payload_bytes += u64::from(size);
        self.bytes_written += prefix_len as u64 + u64::from(size);
        Ok(())
    }

    /// Get number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Get the header written at the start of the container.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Flush the sink and report what was written.
    pub fn finish(mut self) -> Result<ContainerStats> {
        self.writer.flush()?;

        let stats = ContainerStats {
            frame_count: self.frames_written,
            total_bytes: self.bytes_written,
            average_frame_size: self
                .payload_bytes
                .checked_div(self.frames_written)
                .unwrap_or(0),
        };
        debug!("Finished ASCV container: {stats}");
        Ok(stats)
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Statistics from a write session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStats {
    /// Total frames written.
    pub frame_count: u64,
    /// Total bytes written, header included.
    pub total_bytes: u64,
    /// Average stored frame size, prefix excluded.
    pub average_frame_size: u64,
}

impl std::fmt::Display for ContainerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} bytes total, {} bytes/frame avg",
            self.frame_count, self.total_bytes, self.average_frame_size
        )
    }
}

/// Write a header followed by `frames` in order.
///
/// Stops at the first I/O failure; whatever reached the sink stays there.
pub fn write_container<W: Write>(
    writer: W,
    header: &Header,
    frames: &[Frame],
) -> Result<ContainerStats> {
    let mut container = ContainerWriter::new(writer, *header)?;
    for frame in frames {
        container.write_frame(frame)?;
    }
    container.finish()
}

/// Create (or truncate) `path` and write a container to it.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    header: &Header,
    frames: &[Frame],
) -> Result<ContainerStats> {
    let file = File::create(path)?;
    write_container(BufWriter::new(file), header, frames)
}
