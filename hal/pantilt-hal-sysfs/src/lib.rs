//! Linux sysfs PWM backend
//!
//! This crate implements `pantilt_hal::PwmChannel` on top of the kernel's
//! PWM class interface:
//!
//! ```text
//! /sys/class/pwm/pwmchip<N>/
//! ├── export          write a channel number to create pwm<M>/
//! ├── unexport        write it again to remove it
//! ├── npwm            number of channels on this controller
//! └── pwm<M>/
//!     ├── period      ns
//!     ├── duty_cycle  ns, must not exceed period
//!     └── enable      0 / 1
//! ```
//!
//! - Controller resolution from index or explicit path
//! - Channel export/unexport with readiness polling
//! - Fraction <-> nanosecond duty cycle conversion

#![deny(unsafe_code)]

pub mod chip;
pub mod pwm;

pub use chip::{resolve_chip_dir, DEFAULT_SYSFS_ROOT};
pub use pwm::SysfsPwm;
