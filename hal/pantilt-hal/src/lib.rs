//! Pantilt Hardware Abstraction Layer
//!
//! This crate defines the PWM channel trait that backend crates implement
//! (Linux sysfs today). Application code only ever talks to
//! [`pwm::PwmChannel`], so the same sweep logic can drive any backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (pantilt-sweeper)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pantilt-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ pantilt-hal-  │       │  mock (tests) │
//! │    sysfs      │       │               │
//! └───────────────┘       └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "mock"))]
extern crate std;

#[cfg(feature = "mock")]
pub mod mock;
pub mod pwm;

// Re-export key types at crate root for convenience
pub use pwm::{ChannelId, PwmChannel, PwmError};
