//! Recording PWM channel for host tests
//!
//! Every call is appended to a shared [`PwmLog`], which stays readable after
//! the channel itself has been moved into a driver or closed. Individual
//! operations can be made to fail to exercise error paths.

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::pwm::{ChannelId, PwmChannel, PwmError};

/// One recorded call on a [`MockPwm`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PwmOp {
    SetFrequency(f32),
    SetDutyCycle(f32),
    Enable,
    Disable,
    Close,
}

/// Operation kinds that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    SetFrequency,
    SetDutyCycle,
    Enable,
    Disable,
    Close,
}

#[derive(Debug, Default)]
struct Shared {
    ops: Vec<PwmOp>,
    fail_on: Vec<FailOn>,
}

/// Shared handle onto a mock channel's call history and failure switches
#[derive(Debug, Clone, Default)]
pub struct PwmLog(Arc<Mutex<Shared>>);

impl PwmLog {
    fn push(&self, op: PwmOp) {
        if let Ok(mut shared) = self.0.lock() {
            shared.ops.push(op);
        }
    }

    fn should_fail(&self, op: FailOn) -> bool {
        self.0
            .lock()
            .map(|shared| shared.fail_on.contains(&op))
            .unwrap_or(false)
    }

    /// Make every later call of the given kind return [`PwmError::Io`]
    ///
    /// The call is still recorded before failing.
    pub fn fail_on(&self, op: FailOn) {
        if let Ok(mut shared) = self.0.lock() {
            shared.fail_on.push(op);
        }
    }

    /// Snapshot of all recorded operations, in call order
    pub fn ops(&self) -> Vec<PwmOp> {
        self.0
            .lock()
            .map(|shared| shared.ops.clone())
            .unwrap_or_default()
    }

    /// All duty cycles written, in call order
    pub fn duty_cycles(&self) -> Vec<f32> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                PwmOp::SetDutyCycle(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// Check if the channel was closed
    pub fn was_closed(&self) -> bool {
        self.ops().contains(&PwmOp::Close)
    }
}

/// In-memory PWM channel
#[derive(Debug)]
pub struct MockPwm {
    id: ChannelId,
    frequency: f32,
    duty: f32,
    enabled: bool,
    log: PwmLog,
}

impl MockPwm {
    /// Create a mock channel and the log that observes it
    pub fn new(id: ChannelId) -> (Self, PwmLog) {
        let log = PwmLog::default();
        let pwm = Self {
            id,
            frequency: 0.0,
            duty: 0.0,
            enabled: false,
            log: log.clone(),
        };
        (pwm, log)
    }

    /// Builder form of [`PwmLog::fail_on`]
    pub fn fail_on(self, op: FailOn) -> Self {
        self.log.fail_on(op);
        self
    }

    fn check(&self, op: FailOn) -> Result<(), PwmError> {
        if self.log.should_fail(op) {
            Err(PwmError::Io)
        } else {
            Ok(())
        }
    }
}

impl PwmChannel for MockPwm {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn set_frequency(&mut self, hz: f32) -> Result<(), PwmError> {
        self.log.push(PwmOp::SetFrequency(hz));
        self.check(FailOn::SetFrequency)?;
        self.frequency = hz;
        Ok(())
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), PwmError> {
        self.log.push(PwmOp::SetDutyCycle(fraction));
        self.check(FailOn::SetDutyCycle)?;
        self.duty = fraction.clamp(0.0, 1.0);
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty
    }

    fn enable(&mut self) -> Result<(), PwmError> {
        self.log.push(PwmOp::Enable);
        self.check(FailOn::Enable)?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), PwmError> {
        self.log.push(PwmOp::Disable);
        self.check(FailOn::Disable)?;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn close(self) -> Result<(), PwmError> {
        self.log.push(PwmOp::Close);
        self.check(FailOn::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_operations() {
        let (mut pwm, log) = MockPwm::new(ChannelId::new(0, 0));

        pwm.set_frequency(50.0).unwrap();
        pwm.set_duty_cycle(0.075).unwrap();
        pwm.enable().unwrap();
        pwm.close().unwrap();

        assert_eq!(
            log.ops(),
            std::vec![
                PwmOp::SetFrequency(50.0),
                PwmOp::SetDutyCycle(0.075),
                PwmOp::Enable,
                PwmOp::Close,
            ]
        );
        assert!(log.was_closed());
    }

    #[test]
    fn test_injected_failure_still_recorded() {
        let (pwm, log) = MockPwm::new(ChannelId::new(0, 0));
        let mut pwm = pwm.fail_on(FailOn::Disable);

        assert_eq!(pwm.disable(), Err(PwmError::Io));
        assert_eq!(log.ops(), std::vec![PwmOp::Disable]);
        assert!(!pwm.is_enabled());
    }

    #[test]
    fn test_failure_injected_through_log() {
        let (mut pwm, log) = MockPwm::new(ChannelId::new(0, 0));

        pwm.set_duty_cycle(0.1).unwrap();
        log.fail_on(FailOn::SetDutyCycle);

        assert_eq!(pwm.set_duty_cycle(0.2), Err(PwmError::Io));
        assert_eq!(pwm.duty_cycle(), 0.1);
    }
}
