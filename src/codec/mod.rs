//! Codec module - Standalone byte codecs used by the container format.
//!
//! - `vlq`: variable-length length prefixes
//! - `rle`: run-length compression of frame payloads
//!
//! Both are pure functions over byte slices and can be used without the
//! container layer.

pub mod rle;
pub mod vlq;
