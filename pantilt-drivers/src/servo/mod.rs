//! Servo driver implementations
//!
//! - Hobby servo: PWM-controlled, pulse width proportional to angle

pub mod hobby;

pub use hobby::{Servo, ServoConfig};
