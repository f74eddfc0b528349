//! Error type shared by the codecs and the container layer.

use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while encoding or decoding ASCV data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid ASCV magic bytes: {found:?}")]
    InvalidFormat { found: [u8; 4] },
    #[error("Malformed RLE data: length {len} is not a whole number of (count, byte) pairs")]
    MalformedData { len: usize },
    #[error("Unexpected end of input")]
    EndOfInput,
    #[error("VLQ value does not fit in 32 bits")]
    VlqOverflow,
    #[error("Frame of {size} bytes exceeds the 32-bit length prefix")]
    FrameTooLarge { size: usize },
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::EndOfInput,
            _ => Error::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_eof_maps_to_end_of_input() {
        let err: Error = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(err, Error::EndOfInput));
    }

    #[test]
    fn test_other_io_errors_are_kept() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        match err {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
