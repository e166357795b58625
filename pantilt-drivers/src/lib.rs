//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pantilt-core on top of any `pantilt_hal::PwmChannel`:
//!
//! - Hobby servo driver (angle -> duty cycle)
//! - Pan/tilt rig with best-effort shutdown

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod rig;
pub mod servo;

pub use rig::{PanTilt, ShutdownFailure, ShutdownReport, ShutdownStep};
pub use servo::{Servo, ServoConfig};
