//! Pan/tilt rig
//!
//! Holds the two servo handles for the life of the process and owns the
//! shutdown sequence. Either servo may be missing (e.g. tilt failed to
//! open); shutdown handles whatever is present.
//!
//! # Shutdown sequence
//!
//! ```text
//! 1. center pan, center tilt        (each independently)
//! 2. settle delay                   (once, if anything was centered)
//! 3. disable + release pan          (each step independently)
//! 4. disable + release tilt
//! ```
//!
//! No step can stop a later one. Failures are collected in a
//! [`ShutdownReport`] instead of being returned.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use pantilt_core::traits::{ServoDriver, ServoRole};
use pantilt_hal::{PwmChannel, PwmError};

use crate::servo::Servo;

/// Maximum failures one shutdown can produce (3 steps x 2 servos)
pub const MAX_SHUTDOWN_FAILURES: usize = 6;

/// A step of the shutdown sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStep {
    /// Moving the servo to 90°
    Center,
    /// Disabling the PWM output
    Disable,
    /// Releasing the PWM channel
    Release,
}

/// A shutdown step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownFailure {
    pub role: ServoRole,
    pub step: ShutdownStep,
    pub error: PwmError,
}

/// Outcome of [`PanTilt::shutdown`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Servos whose channel was released successfully
    pub released: Vec<ServoRole, 2>,
    /// Every step that failed, in execution order
    pub failures: Vec<ShutdownFailure, MAX_SHUTDOWN_FAILURES>,
    /// Whether the settle delay was waited
    pub settled: bool,
}

impl ShutdownReport {
    /// Check if every step succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, role: ServoRole, step: ShutdownStep, result: Result<(), PwmError>) -> bool {
        match result {
            Ok(()) => true,
            Err(error) => {
                // Capacity covers every step of both servos
                let _ = self.failures.push(ShutdownFailure { role, step, error });
                false
            }
        }
    }
}

/// The pan and tilt servos
pub struct PanTilt<P: PwmChannel> {
    pan: Option<Servo<P>>,
    tilt: Option<Servo<P>>,
}

impl<P: PwmChannel> Default for PanTilt<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PwmChannel> PanTilt<P> {
    /// Create an empty rig
    pub fn new() -> Self {
        Self {
            pan: None,
            tilt: None,
        }
    }

    /// Install a servo in the given role
    ///
    /// Returns the servo previously in that role, if any.
    pub fn attach(&mut self, role: ServoRole, servo: Servo<P>) -> Option<Servo<P>> {
        self.slot(role).replace(servo)
    }

    /// Get the servo for a role
    pub fn servo(&self, role: ServoRole) -> Option<&Servo<P>> {
        match role {
            ServoRole::Pan => self.pan.as_ref(),
            ServoRole::Tilt => self.tilt.as_ref(),
        }
    }

    /// Get the servo for a role, mutably
    pub fn servo_mut(&mut self, role: ServoRole) -> Option<&mut Servo<P>> {
        self.slot(role).as_mut()
    }

    /// Check if no servo is installed
    pub fn is_empty(&self) -> bool {
        self.pan.is_none() && self.tilt.is_none()
    }

    fn slot(&mut self, role: ServoRole) -> &mut Option<Servo<P>> {
        match role {
            ServoRole::Pan => &mut self.pan,
            ServoRole::Tilt => &mut self.tilt,
        }
    }

    /// Re-center, settle, then disable and release every installed servo
    ///
    /// Never fails: each step's error is recorded and the sequence moves on.
    /// Consumes the rig, so channels are released exactly once.
    pub fn shutdown<D: DelayNs>(mut self, delay: &mut D, settle_ms: u32) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        let mut centered = false;

        for role in [ServoRole::Pan, ServoRole::Tilt] {
            if let Some(servo) = self.slot(role).as_mut() {
                centered |= report.record(role, ShutdownStep::Center, servo.center());
            }
        }

        if centered {
            delay.delay_ms(settle_ms);
            report.settled = true;
        }

        for role in [ServoRole::Pan, ServoRole::Tilt] {
            if let Some(mut servo) = self.slot(role).take() {
                report.record(role, ShutdownStep::Disable, servo.disable());
                if report.record(role, ShutdownStep::Release, servo.release()) {
                    let _ = report.released.push(role);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::ServoConfig;
    use pantilt_hal::mock::{FailOn, MockPwm, PwmLog, PwmOp};
    use pantilt_hal::ChannelId;

    /// Records requested delays instead of sleeping
    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    fn servo(pwm: MockPwm) -> Servo<MockPwm> {
        Servo::new(pwm, ServoConfig::default()).unwrap()
    }

    fn rig() -> (PanTilt<MockPwm>, PwmLog, PwmLog) {
        let (pan, pan_log) = MockPwm::new(ChannelId::new(0, 0));
        let (tilt, tilt_log) = MockPwm::new(ChannelId::new(1, 0));
        let mut rig = PanTilt::new();
        rig.attach(ServoRole::Pan, servo(pan));
        rig.attach(ServoRole::Tilt, servo(tilt));
        (rig, pan_log, tilt_log)
    }

    fn shutdown_ops(log: &PwmLog) -> std::vec::Vec<PwmOp> {
        // Skip the 3 bring-up operations
        log.ops()[3..].to_vec()
    }

    #[test]
    fn test_clean_shutdown() {
        let (rig, pan_log, tilt_log) = rig();
        let mut delay = RecordingDelay::default();

        let report = rig.shutdown(&mut delay, 1000);

        assert!(report.is_clean());
        assert!(report.settled);
        assert_eq!(report.released.as_slice(), &[ServoRole::Pan, ServoRole::Tilt]);
        assert_eq!(delay.total_ns, 1_000_000_000);

        for log in [&pan_log, &tilt_log] {
            let ops = shutdown_ops(log);
            assert_eq!(ops.len(), 3);
            assert!(matches!(ops[0], PwmOp::SetDutyCycle(d) if (d - 0.075).abs() < 1e-6));
            assert_eq!(&ops[1..], &[PwmOp::Disable, PwmOp::Close]);
        }
    }

    #[test]
    fn test_only_pan_initialized() {
        let (pan, pan_log) = MockPwm::new(ChannelId::new(0, 0));
        let mut rig = PanTilt::new();
        rig.attach(ServoRole::Pan, servo(pan));

        let report = rig.shutdown(&mut RecordingDelay::default(), 1000);

        assert!(report.is_clean());
        assert_eq!(report.released.as_slice(), &[ServoRole::Pan]);
        assert!(pan_log.was_closed());
    }

    #[test]
    fn test_empty_rig_skips_settle() {
        let rig: PanTilt<MockPwm> = PanTilt::new();
        let mut delay = RecordingDelay::default();

        let report = rig.shutdown(&mut delay, 1000);

        assert!(report.is_clean());
        assert!(!report.settled);
        assert!(report.released.is_empty());
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn test_center_failure_does_not_stop_release() {
        let (rig, pan_log, tilt_log) = rig();
        pan_log.fail_on(FailOn::SetDutyCycle);

        let report = rig.shutdown(&mut RecordingDelay::default(), 10);

        assert_eq!(
            report.failures.as_slice(),
            &[ShutdownFailure {
                role: ServoRole::Pan,
                step: ShutdownStep::Center,
                error: PwmError::Io,
            }]
        );
        // Tilt still centered, so the rig settles
        assert!(report.settled);
        assert!(pan_log.was_closed());
        assert!(tilt_log.was_closed());
        assert_eq!(report.released.as_slice(), &[ServoRole::Pan, ServoRole::Tilt]);
    }

    #[test]
    fn test_disable_failure_still_releases() {
        let (rig, pan_log, _tilt_log) = rig();
        pan_log.fail_on(FailOn::Disable);

        let report = rig.shutdown(&mut RecordingDelay::default(), 10);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].step, ShutdownStep::Disable);
        assert!(pan_log.was_closed());
        assert_eq!(report.released.as_slice(), &[ServoRole::Pan, ServoRole::Tilt]);
    }

    #[test]
    fn test_every_step_failing_is_contained() {
        let (rig, pan_log, tilt_log) = rig();
        for log in [&pan_log, &tilt_log] {
            log.fail_on(FailOn::SetDutyCycle);
            log.fail_on(FailOn::Disable);
            log.fail_on(FailOn::Close);
        }
        let mut delay = RecordingDelay::default();

        let report = rig.shutdown(&mut delay, 10);

        assert_eq!(report.failures.len(), MAX_SHUTDOWN_FAILURES);
        assert!(!report.settled);
        assert_eq!(delay.total_ns, 0);
        assert!(report.released.is_empty());
        // Release was still attempted on both
        assert!(pan_log.was_closed());
        assert!(tilt_log.was_closed());
    }

    #[test]
    fn test_attach_replaces_previous() {
        let (mut rig, pan_log, _tilt_log) = rig();
        let (other, _) = MockPwm::new(ChannelId::new(3, 0));

        let old = rig.attach(ServoRole::Pan, servo(other)).unwrap();

        assert_eq!(old.id(), ChannelId::new(0, 0));
        assert_eq!(rig.servo(ServoRole::Pan).map(|s| s.id()), Some(ChannelId::new(3, 0)));
        old.release().unwrap();
        assert!(pan_log.was_closed());
    }
}
