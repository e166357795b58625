//! Servo driver trait
//!
//! A positional hobby servo: command an angle, it moves there and holds.

use core::fmt;

use crate::angle::ANGLE_CENTER;

/// Which axis of the rig a servo drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoRole {
    /// Horizontal axis, swept
    Pan,
    /// Vertical axis, held at center
    Tilt,
}

impl fmt::Display for ServoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServoRole::Pan => f.write_str("pan"),
            ServoRole::Tilt => f.write_str("tilt"),
        }
    }
}

/// Positional servo
pub trait ServoDriver {
    /// Error type of the underlying output
    type Error;

    /// Move to the given angle in degrees
    ///
    /// Out-of-range angles are clamped to 0-180°.
    fn set_angle(&mut self, degrees: f32) -> Result<(), Self::Error>;

    /// Last commanded angle, if any
    fn angle(&self) -> Option<f32>;

    /// Move to the neutral position (90°)
    fn center(&mut self) -> Result<(), Self::Error> {
        self.set_angle(ANGLE_CENTER)
    }
}
