//! Configuration loading
//!
//! The sweeper reads a TOML file given on the command line, or falls back
//! to the default compiled into the binary.

mod loader;

pub use loader::{load, ConfigSource};
