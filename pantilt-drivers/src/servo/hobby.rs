//! Hobby servo driver over a PWM channel
//!
//! This driver provides:
//! - Channel bring-up (frequency, zero duty, enable)
//! - Angle commands mapped through the servo calibration
//! - Orderly release (disable + close)
//!
//! # Usage
//!
//! ```ignore
//! let mut servo = Servo::new(pwm, ServoConfig::from(calibration))?;
//! servo.set_angle(45.0)?;
//! servo.center()?;
//! ```

use pantilt_core::angle::{angle_to_duty, clamp_angle};
use pantilt_core::config::ServoCalibration;
use pantilt_core::traits::ServoDriver;
use pantilt_hal::{ChannelId, PwmChannel, PwmError};

/// Servo driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ServoConfig {
    /// Signal calibration (frequency and pulse range)
    pub calibration: ServoCalibration,
}

impl From<ServoCalibration> for ServoConfig {
    fn from(calibration: ServoCalibration) -> Self {
        Self { calibration }
    }
}

/// Hobby servo on a PWM channel
///
/// Owns the channel for its whole life. The channel is only given back to
/// the OS through [`Servo::release`].
pub struct Servo<P: PwmChannel> {
    pwm: P,
    config: ServoConfig,
    /// Last commanded angle (clamped)
    angle: Option<f32>,
}

impl<P: PwmChannel> Servo<P> {
    /// Bring up a channel for servo use
    ///
    /// Sets the frequency, writes a zero duty cycle so the servo does not
    /// jump on enable, then enables the output. On failure the channel is
    /// closed before returning the error.
    pub fn new(mut pwm: P, config: ServoConfig) -> Result<Self, PwmError> {
        let setup = pwm
            .set_frequency(config.calibration.frequency_hz)
            .and_then(|_| pwm.set_duty_cycle(0.0))
            .and_then(|_| pwm.enable());

        match setup {
            Ok(()) => Ok(Self {
                pwm,
                config,
                angle: None,
            }),
            Err(e) => {
                // Setup error takes precedence over close error
                let _ = pwm.close();
                Err(e)
            }
        }
    }

    /// Channel this servo is attached to
    pub fn id(&self) -> ChannelId {
        self.pwm.id()
    }

    /// Get the configuration
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Borrow the underlying channel
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Stop driving the output, keeping the channel
    pub fn disable(&mut self) -> Result<(), PwmError> {
        self.pwm.disable()
    }

    /// Give the channel back to the OS
    pub fn release(self) -> Result<(), PwmError> {
        self.pwm.close()
    }
}

impl<P: PwmChannel> ServoDriver for Servo<P> {
    type Error = PwmError;

    fn set_angle(&mut self, degrees: f32) -> Result<(), PwmError> {
        let angle = clamp_angle(degrees);
        self.pwm
            .set_duty_cycle(angle_to_duty(angle, &self.config.calibration))?;
        self.angle = Some(angle);
        Ok(())
    }

    fn angle(&self) -> Option<f32> {
        self.angle
    }
}
