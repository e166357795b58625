//! Configuration types
//!
//! Backend-agnostic configuration structures, deserialized from TOML by the
//! application when the `serde` feature is enabled.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
