//! Hardware abstraction traits
//!
//! These traits define the interface between the sweep logic and the
//! concrete servo drivers.

pub mod servo;

pub use servo::{ServoDriver, ServoRole};
