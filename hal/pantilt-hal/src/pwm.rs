//! PWM channel abstractions
//!
//! A PWM channel is addressed by a (controller, channel) pair and exposes
//! the four operations every OS PWM interface offers: frequency, duty cycle,
//! enable/disable and release.

use core::fmt;

/// Identifies one output of one PWM controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId {
    /// Controller index (`pwmchip<N>` on Linux), `None` for a controller
    /// opened by an explicit path with no index
    pub chip: Option<u32>,
    /// Channel index within the controller (`pwm<N>` on Linux)
    pub channel: u32,
}

impl ChannelId {
    /// Create a new channel identifier
    pub const fn new(chip: u32, channel: u32) -> Self {
        Self {
            chip: Some(chip),
            channel,
        }
    }

    /// Channel on a controller that has no index
    pub const fn unindexed(channel: u32) -> Self {
        Self {
            chip: None,
            channel,
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chip {
            Some(chip) => write!(f, "pwmchip{}/pwm{}", chip, self.channel),
            None => write!(f, "pwm{}", self.channel),
        }
    }
}

/// Errors from PWM channel operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Controller or channel does not exist
    NotFound,
    /// Channel was exported but never became ready
    ExportTimeout,
    /// Insufficient permissions on the device node
    PermissionDenied,
    /// The driver rejected the value (e.g. duty cycle above period)
    InvalidValue,
    /// Reading an attribute returned something unparseable
    Parse,
    /// Any other I/O failure
    Io,
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PwmError::NotFound => "PWM controller or channel not found",
            PwmError::ExportTimeout => "timed out waiting for exported PWM channel",
            PwmError::PermissionDenied => "permission denied on PWM device",
            PwmError::InvalidValue => "PWM driver rejected value",
            PwmError::Parse => "malformed PWM attribute",
            PwmError::Io => "PWM I/O error",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for PwmError {}

impl embedded_hal::pwm::Error for PwmError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

/// A single hardware PWM output
///
/// The duty cycle is expressed as a **fraction of the period** (0.0 - 1.0).
/// Backends that work in absolute time (e.g. nanoseconds on Linux) convert
/// using the currently configured frequency.
pub trait PwmChannel {
    /// Which controller/channel this handle drives
    fn id(&self) -> ChannelId;

    /// Set the output frequency in Hz
    fn set_frequency(&mut self, hz: f32) -> Result<(), PwmError>;

    /// Get the configured output frequency in Hz
    fn frequency(&self) -> f32;

    /// Set the duty cycle as a fraction of the period
    ///
    /// Values outside 0.0 - 1.0 are clamped by the implementation.
    fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), PwmError>;

    /// Get the last duty cycle written, as a fraction of the period
    fn duty_cycle(&self) -> f32;

    /// Start driving the output
    fn enable(&mut self) -> Result<(), PwmError>;

    /// Stop driving the output
    fn disable(&mut self) -> Result<(), PwmError>;

    /// Check if the output is enabled
    fn is_enabled(&self) -> bool;

    /// Release the channel back to the OS
    ///
    /// Consumes the handle, so a channel is released at most once.
    fn close(self) -> Result<(), PwmError>
    where
        Self: Sized;
}
