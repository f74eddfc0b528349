//! Container reader for parsing a header and its frames back.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use log::{debug, trace, warn};

use super::format::{Frame, Header};
use crate::codec::vlq;
use crate::error::{Error, Result};

/// Initial content buffer capacity; larger frames grow as bytes arrive.
const CONTENT_CHUNK: usize = 64 * 1024;

/// How the reader treats a length prefix it cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPrefixPolicy {
    /// Any prefix decode failure ends the stream without error, so a
    /// truncated prefix looks the same as a clean end of input. Prefixes
    /// wider than 32 bits keep their low 32 bits.
    #[default]
    Lenient,
    /// Only a clean end of input at a record boundary ends the stream.
    /// Truncated prefixes and prefixes wider than 32 bits are errors.
    Strict,
}

/// Options controlling container parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub length_prefix: LengthPrefixPolicy,
}

impl ReadOptions {
    /// Options that reject truncated or overflowing length prefixes.
    pub fn strict() -> Self {
        Self {
            length_prefix: LengthPrefixPolicy::Strict,
        }
    }
}

/// Reader that parses a container from any byte source.
///
/// Content is returned as stored; callers check [`Header::compression`]
/// and decode frames themselves.
///
/// Usage:
/// ```ignore
/// let mut reader = ContainerReader::new(file)?;
/// let compression = reader.header().compression().unwrap_or_default();
/// for frame in reader.frames() {
///     let text = frame?.decode(compression)?;
///     // Draw text...
/// }
/// ```
pub struct ContainerReader<R: Read> {
    reader: R,
    header: Header,
    options: ReadOptions,
    frames_read: u64,
    finished: bool,
}

impl<R: Read> ContainerReader<R> {
    /// Read and validate the header with default options.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, ReadOptions::default())
    }

    /// Read and validate the header.
    pub fn with_options(mut reader: R, options: ReadOptions) -> Result<Self> {
        let header = Header::read_from(&mut reader)?;
        debug!(
            "Read ASCV header: version {}, {}x{} @ {} fps, {} frames declared, compression {}",
            header.version,
            header.width,
            header.height,
            header.fps,
            header.frames,
            header.compression
        );

        Ok(Self {
            reader,
            header,
            options,
            frames_read: 0,
            finished: false,
        })
    }

    /// Get container header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get number of frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next frame, or `None` once the stream has ended.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        let size = match self.read_length_prefix() {
            Ok(Some(size)) => size,
            Ok(None) => {
                self.finish();
                return Ok(None);
            }
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        let content = match self.read_content(size) {
            Ok(content) => content,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        trace!("Frame {}: {} bytes", self.frames_read, size);
        self.frames_read += 1;
        Ok(Some(Frame::new(content)))
    }

    /// Read exactly `size` content bytes.
    ///
    /// The buffer grows with the data actually present, so a bogus length
    /// fails with `EndOfInput` instead of allocating it up front.
    fn read_content(&mut self, size: u32) -> Result<Vec<u8>> {
        let mut content = Vec::with_capacity((size as usize).min(CONTENT_CHUNK));
        (&mut self.reader)
            .take(u64::from(size))
            .read_to_end(&mut content)?;
        if content.len() < size as usize {
            return Err(Error::EndOfInput);
        }
        Ok(content)
    }

    /// Decode the next length prefix.
    ///
    /// `Ok(None)` marks the end of the frame sequence.
    fn read_length_prefix(&mut self) -> Result<Option<u32>> {
        let mut decoder = vlq::Decoder::new();
        let mut byte = [0u8; 1];

        let failure = loop {
            match self.reader.read(&mut byte) {
                Ok(0) if !decoder.in_progress() => return Ok(None),
                Ok(0) => break Error::EndOfInput,
                Ok(_) => {
                    if let Some(size) = decoder.push(byte[0]) {
                        return self.accept_length_prefix(size, &decoder);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => break e.into(),
            }
        };

        match self.options.length_prefix {
            LengthPrefixPolicy::Lenient => {
                warn!(
                    "Stopping after frame {}: unreadable length prefix ({failure})",
                    self.frames_read
                );
                Ok(None)
            }
            LengthPrefixPolicy::Strict => Err(failure),
        }
    }

    fn accept_length_prefix(&self, size: u32, decoder: &vlq::Decoder) -> Result<Option<u32>> {
        if decoder.overflowed() {
            if self.options.length_prefix == LengthPrefixPolicy::Strict {
                return Err(Error::VlqOverflow);
            }
            warn!(
                "Length prefix of frame {} exceeds 32 bits; keeping low bits ({size})",
                self.frames_read
            );
        }
        Ok(Some(size))
    }

    fn finish(&mut self) {
        self.finished = true;
        if u64::from(self.header.frames) != self.frames_read {
            warn!(
                "Header declares {} frames but stream holds {}",
                self.header.frames, self.frames_read
            );
        }
        debug!("Finished reading {} frames", self.frames_read);
    }

    /// Create an iterator over the remaining frames.
    pub fn frames(&mut self) -> FrameIterator<'_, R> {
        FrameIterator { reader: self }
    }

    /// Collect every remaining frame.
    pub fn read_to_end(&mut self) -> Result<Vec<Frame>> {
        self.frames().collect()
    }

    /// Hand back the underlying source, positioned after the last frame read.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Iterator over container frames.
pub struct FrameIterator<'a, R: Read> {
    reader: &'a mut ContainerReader<R>,
}

impl<R: Read> Iterator for FrameIterator<'_, R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_frame().transpose()
    }
}

/// Parse a header and all frames from `reader`.
pub fn read_container<R: Read>(reader: R) -> Result<(Header, Vec<Frame>)> {
    read_container_with(reader, ReadOptions::default())
}

/// Parse a header and all frames from `reader` with explicit options.
pub fn read_container_with<R: Read>(
    reader: R,
    options: ReadOptions,
) -> Result<(Header, Vec<Frame>)> {
    let mut container = ContainerReader::with_options(reader, options)?;
    let frames = container.read_to_end()?;
    Ok((*container.header(), frames))
}

/// Open `path` and parse the container it holds.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(Header, Vec<Frame>)> {
    let file = File::open(path)?;
    read_container(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::format::{Compression, MAGIC};
    use crate::container::writer::{write_container, write_file};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn test_header(frames: u32) -> Header {
        Header {
            width: 16,
            height: 4,
            fps: 24,
            frames,
            compression: Compression::Rle.as_u8(),
            charset: 2,
            reserved: [0x5A; 16],
            ..Default::default()
        }
    }

    fn text_frame(i: usize) -> Vec<u8> {
        let mut text = Vec::new();
        for row in 0..4 {
            text.extend(std::iter::repeat_n(b' ', (i + row) % 16));
            text.extend(std::iter::repeat_n(b'@', 16 - (i + row) % 16));
            text.push(b'\n');
        }
        text
    }

    fn encode_container(header: &Header, frames: &[Frame]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_container(&mut buf, header, frames).unwrap();
        buf
    }

    #[test]
    fn test_roundtrip_frame_counts() {
        for n in [0usize, 1, 5] {
            let header = test_header(n as u32);
            let frames: Vec<Frame> = (0..n)
                .map(|i| Frame::encode(&text_frame(i), Compression::Rle))
                .collect();

            let buf = encode_container(&header, &frames);
            let (decoded_header, decoded) = read_container(Cursor::new(buf)).unwrap();

            assert_eq!(decoded_header, header);
            assert_eq!(decoded, frames, "frame mismatch for {n} frames");
            for (i, frame) in decoded.iter().enumerate() {
                assert_eq!(frame.decode(Compression::Rle).unwrap(), text_frame(i));
            }
        }
    }

    #[test]
    fn test_declared_count_is_advisory() {
        let header = test_header(99);
        let frames = vec![Frame::new(b"one".to_vec()), Frame::new(b"two".to_vec())];
        let buf = encode_container(&header, &frames);

        let (decoded_header, decoded) = read_container(Cursor::new(buf)).unwrap();
        assert_eq!(decoded_header.frames, 99);
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_bad_magic() {
        let mut buf = encode_container(&test_header(0), &[]);
        buf[0..4].copy_from_slice(b"ASCV");
        assert!(matches!(
            read_container(Cursor::new(buf)),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_short_header() {
        let buf = MAGIC.to_vec();
        assert!(matches!(
            read_container(Cursor::new(buf)),
            Err(Error::EndOfInput)
        ));
    }

    #[test]
    fn test_truncated_content_is_error() {
        let frames = vec![Frame::new(b"first".to_vec()), Frame::new(b"second".to_vec())];
        let mut buf = encode_container(&test_header(2), &frames);
        buf.truncate(buf.len() - 3);

        for options in [ReadOptions::default(), ReadOptions::strict()] {
            assert!(matches!(
                read_container_with(Cursor::new(buf.clone()), options),
                Err(Error::EndOfInput)
            ));
        }
    }

    #[test]
    fn test_truncated_prefix_lenient() {
        let frames = vec![Frame::new(b"kept".to_vec())];
        let mut buf = encode_container(&test_header(2), &frames);
        // Dangling continuation byte.
        buf.push(0x80);

        let (_, decoded) = read_container(Cursor::new(buf)).unwrap();
        assert_eq!(decoded, frames);
    }

    #[test]
    fn test_truncated_prefix_strict() {
        let frames = vec![Frame::new(b"kept".to_vec())];
        let mut buf = encode_container(&test_header(2), &frames);
        buf.push(0x80);

        assert!(matches!(
            read_container_with(Cursor::new(buf), ReadOptions::strict()),
            Err(Error::EndOfInput)
        ));
    }

    #[test]
    fn test_overflowing_prefix() {
        // Low 32 bits decode to u32::MAX, far more than the stream holds.
        let mut buf = encode_container(&test_header(0), &[]);
        buf.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);

        assert!(matches!(
            read_container(Cursor::new(buf.clone())),
            Err(Error::EndOfInput)
        ));
        assert!(matches!(
            read_container_with(Cursor::new(buf), ReadOptions::strict()),
            Err(Error::VlqOverflow)
        ));
    }

    #[test]
    fn test_huge_declared_length_without_content() {
        let mut buf = encode_container(&test_header(1), &[]);
        buf.extend_from_slice(&vlq::encode(u32::MAX));
        buf.extend_from_slice(b"short");

        for options in [ReadOptions::default(), ReadOptions::strict()] {
            assert!(matches!(
                read_container_with(Cursor::new(buf.clone()), options),
                Err(Error::EndOfInput)
            ));
        }
    }

    #[test]
    fn test_padded_prefix_keeps_following_frames() {
        let mut buf = encode_container(&test_header(2), &[]);
        // Length 1 padded with zero continuation groups.
        buf.extend_from_slice(&[0x81, 0x80, 0x80, 0x80, 0x80, 0x00, b'a']);
        buf.extend_from_slice(&[1, b'b']);

        let expected = vec![Frame::new(b"a".to_vec()), Frame::new(b"b".to_vec())];
        for options in [ReadOptions::default(), ReadOptions::strict()] {
            let (_, decoded) = read_container_with(Cursor::new(buf.clone()), options).unwrap();
            assert_eq!(decoded, expected);
        }
    }

    #[test]
    fn test_large_frame_roundtrip() {
        let frames = vec![Frame::new(vec![b'#'; CONTENT_CHUNK * 3 + 17])];
        let buf = encode_container(&test_header(1), &frames);
        let (_, decoded) = read_container(Cursor::new(buf)).unwrap();
        assert_eq!(decoded, frames);
    }

    #[test]
    fn test_strict_clean_end() {
        let frames = vec![Frame::new(b"a".to_vec()), Frame::default()];
        let buf = encode_container(&test_header(2), &frames);
        let (_, decoded) = read_container_with(Cursor::new(buf), ReadOptions::strict()).unwrap();
        assert_eq!(decoded, frames);
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let frames = vec![Frame::new(b"ok".to_vec()), Frame::new(b"broken".to_vec())];
        let mut buf = encode_container(&test_header(2), &frames);
        buf.truncate(buf.len() - 1);

        let mut reader = ContainerReader::new(Cursor::new(buf)).unwrap();
        let results: Vec<_> = reader.frames().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(reader.frames_read(), 1);
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.ascv");

        let header = test_header(3);
        let frames: Vec<Frame> = (0..3)
            .map(|i| Frame::encode(&text_frame(i), Compression::Rle))
            .collect();

        let stats = write_file(&path, &header, &frames).unwrap();
        assert_eq!(stats.frame_count, 3);
        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            stats.total_bytes
        );

        let (decoded_header, decoded) = read_file(&path).unwrap();
        assert_eq!(decoded_header, header);
        assert_eq!(decoded, frames);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_file(dir.path().join("absent.ascv")),
            Err(Error::Io(_))
        ));
    }
}
