//! Board-agnostic core logic for the pan/tilt servo sweeper
//!
//! This crate contains all application logic that does not depend on
//! a specific PWM backend:
//!
//! - Angle to pulse width / duty cycle mapping
//! - Sweep state machine (ascending / descending passes)
//! - Configuration type definitions and validation
//! - Servo driver trait

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod angle;
pub mod config;
pub mod sweep;
pub mod traits;
