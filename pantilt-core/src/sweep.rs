//! Pan sweep state machine
//!
//! Converts a step size into the endless sequence of pan moves:
//!
//! ```text
//! Ascending:  0, s, 2s, ... (<= 180)   then PassComplete(Ascending)
//! Descending: 180, 180-s, ... (>= 0)   then PassComplete(Descending)
//! ```
//!
//! The iterator never ends; the caller decides when to stop pulling.

/// Highest sweep angle (degrees)
pub const SWEEP_MAX_DEG: u16 = 180;

/// Current sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Moving from 0° toward 180°
    Ascending,
    /// Moving from 180° toward 0°
    Descending,
}

impl SweepDirection {
    /// The direction of the following pass
    pub fn reversed(self) -> Self {
        match self {
            SweepDirection::Ascending => SweepDirection::Descending,
            SweepDirection::Descending => SweepDirection::Ascending,
        }
    }

    /// Angle the pass starts from
    fn start_angle(self) -> u16 {
        match self {
            SweepDirection::Ascending => 0,
            SweepDirection::Descending => SWEEP_MAX_DEG,
        }
    }
}

/// One step of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepEvent {
    /// Move the pan servo to this angle and hold
    Move(u16),
    /// A full pass in the given direction just finished
    PassComplete(SweepDirection),
}

/// Endless back-and-forth sweep
#[derive(Debug, Clone)]
pub struct Sweep {
    step_deg: u16,
    direction: SweepDirection,
    /// Next angle to emit, or None once the pass is exhausted
    next_angle: Option<u16>,
}

impl Sweep {
    /// Create a sweep starting with an ascending pass from 0°
    ///
    /// A zero step is treated as 1° so the sweep always makes progress;
    /// configuration validation rejects it before it gets here.
    pub fn new(step_deg: u16) -> Self {
        Self {
            step_deg: step_deg.max(1),
            direction: SweepDirection::Ascending,
            next_angle: Some(0),
        }
    }

    /// Direction of the pass in progress
    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Step size in degrees
    pub fn step_deg(&self) -> u16 {
        self.step_deg
    }

    fn advance(&self, angle: u16) -> Option<u16> {
        match self.direction {
            SweepDirection::Ascending => angle
                .checked_add(self.step_deg)
                .filter(|next| *next <= SWEEP_MAX_DEG),
            SweepDirection::Descending => angle.checked_sub(self.step_deg),
        }
    }
}

impl Iterator for Sweep {
    type Item = SweepEvent;

    fn next(&mut self) -> Option<SweepEvent> {
        match self.next_angle {
            Some(angle) => {
                self.next_angle = self.advance(angle);
                Some(SweepEvent::Move(angle))
            }
            None => {
                let finished = self.direction;
                self.direction = finished.reversed();
                self.next_angle = Some(self.direction.start_angle());
                Some(SweepEvent::PassComplete(finished))
            }
        }
    }
}
