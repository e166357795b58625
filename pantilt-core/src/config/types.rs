//! Configuration type definitions
//!
//! The sweeper configuration is loaded once at start-up and never mutated.
//! Every field has a default matching a standard 50 Hz hobby servo, so a
//! config file only needs to list what differs.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::ChannelConfig;

/// Servo signal calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServoCalibration {
    /// PWM frequency in Hz (50 Hz -> 20 ms period)
    pub frequency_hz: f32,
    /// Pulse width at 0° (ms)
    pub min_pulse_ms: f32,
    /// Pulse width at 180° (ms)
    pub max_pulse_ms: f32,
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self {
            frequency_hz: 50.0,
            min_pulse_ms: 0.5,
            max_pulse_ms: 2.5,
        }
    }
}

impl ServoCalibration {
    /// PWM period in milliseconds
    pub fn period_ms(&self) -> f32 {
        1000.0 / self.frequency_hz
    }
}

/// Sweep timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SweepConfig {
    /// Pan increment per step (degrees)
    pub step_deg: u16,
    /// Hold time after each step (ms)
    pub step_delay_ms: u32,
    /// Pause after each full pass (ms)
    pub pass_pause_ms: u32,
    /// Hold time after centering, at start-up and at shutdown (ms)
    pub center_delay_ms: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step_deg: 15,
            step_delay_ms: 300,
            pass_pause_ms: 500,
            center_delay_ms: 1000,
        }
    }
}

/// Complete sweeper configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SweeperConfig {
    /// Pan (horizontal) servo output
    pub pan: ChannelConfig,
    /// Tilt (vertical) servo output
    pub tilt: ChannelConfig,
    /// Signal calibration shared by both servos
    pub servo: ServoCalibration,
    /// Sweep timing
    pub sweep: SweepConfig,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            pan: ChannelConfig::indexed(0, 0),
            tilt: ChannelConfig::indexed(1, 0),
            servo: ServoCalibration::default(),
            sweep: SweepConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Frequency is zero, negative or not a number
    InvalidFrequency,
    /// Pulse range is negative, empty or inverted
    InvalidPulseRange,
    /// Maximum pulse does not fit in one PWM period
    PulseExceedsPeriod,
    /// Sweep step must be 1-180 degrees
    InvalidStep,
    /// Pan and tilt point at the same output
    DuplicateChannel,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::InvalidFrequency => "servo.frequency_hz must be a positive number",
            ConfigError::InvalidPulseRange => {
                "servo pulse range must satisfy 0 <= min_pulse_ms < max_pulse_ms"
            }
            ConfigError::PulseExceedsPeriod => "servo.max_pulse_ms exceeds the PWM period",
            ConfigError::InvalidStep => "sweep.step_deg must be between 1 and 180",
            ConfigError::DuplicateChannel => "pan and tilt use the same PWM channel",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ConfigError {}

impl SweeperConfig {
    /// Check the configuration for values the hardware cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let servo = &self.servo;

        // `!(x > 0)` also rejects NaN
        if !(servo.frequency_hz > 0.0) || !servo.frequency_hz.is_finite() {
            return Err(ConfigError::InvalidFrequency);
        }

        if !(servo.min_pulse_ms >= 0.0) || !(servo.min_pulse_ms < servo.max_pulse_ms) {
            return Err(ConfigError::InvalidPulseRange);
        }

        if servo.max_pulse_ms > servo.period_ms() {
            return Err(ConfigError::PulseExceedsPeriod);
        }

        if self.sweep.step_deg == 0 || self.sweep.step_deg > 180 {
            return Err(ConfigError::InvalidStep);
        }

        if self.pan.same_output(&self.tilt) {
            return Err(ConfigError::DuplicateChannel);
        }

        Ok(())
    }
}
