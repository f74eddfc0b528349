//! Schema module - Configuration types for building ASCV containers.

mod config;

pub use config::*;
