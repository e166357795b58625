//! Angle to pulse width mapping
//!
//! Hobby servos encode their target angle in the width of a pulse repeated
//! every PWM period (typically 20 ms at 50 Hz). The mapping here is linear:
//!
//! ```text
//! pulse_ms = min_pulse_ms + (angle / 180) * (max_pulse_ms - min_pulse_ms)
//! duty     = pulse_s / period_s = pulse_ms * frequency_hz / 1000
//! ```
//!
//! Angles outside 0-180° are clamped, never rejected.

use crate::config::ServoCalibration;

/// Lowest commandable angle (degrees)
pub const ANGLE_MIN: f32 = 0.0;

/// Highest commandable angle (degrees)
pub const ANGLE_MAX: f32 = 180.0;

/// Center (neutral) angle used for holding and parking
pub const ANGLE_CENTER: f32 = 90.0;

/// Clamp an angle into the servo's travel
///
/// NaN has no meaningful position and maps to [`ANGLE_CENTER`].
pub fn clamp_angle(degrees: f32) -> f32 {
    if degrees.is_nan() {
        ANGLE_CENTER
    } else {
        degrees.clamp(ANGLE_MIN, ANGLE_MAX)
    }
}

/// Pulse width in milliseconds for the given angle
pub fn pulse_width_ms(degrees: f32, cal: &ServoCalibration) -> f32 {
    let angle = clamp_angle(degrees);
    cal.min_pulse_ms + (angle / ANGLE_MAX) * (cal.max_pulse_ms - cal.min_pulse_ms)
}

/// Express a pulse width as a fraction of the PWM period
///
/// Returns 0.0 for a non-positive frequency instead of dividing by zero.
pub fn duty_fraction(pulse_ms: f32, frequency_hz: f32) -> f32 {
    if frequency_hz <= 0.0 {
        return 0.0;
    }
    let period_s = 1.0 / frequency_hz;
    let pulse_s = pulse_ms / 1000.0;
    pulse_s / period_s
}

/// Duty cycle (fraction of period) for the given angle
pub fn angle_to_duty(degrees: f32, cal: &ServoCalibration) -> f32 {
    duty_fraction(pulse_width_ms(degrees, cal), cal.frequency_hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    fn wide() -> ServoCalibration {
        ServoCalibration {
            frequency_hz: 50.0,
            min_pulse_ms: 0.5,
            max_pulse_ms: 2.5,
        }
    }

    fn narrow() -> ServoCalibration {
        ServoCalibration {
            frequency_hz: 50.0,
            min_pulse_ms: 1.0,
            max_pulse_ms: 2.0,
        }
    }

    #[test]
    fn test_endpoints_and_center() {
        let cal = wide();
        assert!((pulse_width_ms(0.0, &cal) - 0.5).abs() < EPS);
        assert!((pulse_width_ms(90.0, &cal) - 1.5).abs() < EPS);
        assert!((pulse_width_ms(180.0, &cal) - 2.5).abs() < EPS);
    }

    #[test]
    fn test_narrow_range_center() {
        let cal = narrow();
        assert!((pulse_width_ms(90.0, &cal) - 1.5).abs() < EPS);
        assert!((pulse_width_ms(45.0, &cal) - 1.25).abs() < EPS);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let cal = wide();
        assert!((pulse_width_ms(-45.0, &cal) - 0.5).abs() < EPS);
        assert!((pulse_width_ms(720.0, &cal) - 2.5).abs() < EPS);
        assert!((pulse_width_ms(f32::NEG_INFINITY, &cal) - 0.5).abs() < EPS);
        assert!((pulse_width_ms(f32::INFINITY, &cal) - 2.5).abs() < EPS);
    }

    #[test]
    fn test_nan_maps_to_center() {
        assert_eq!(clamp_angle(f32::NAN), ANGLE_CENTER);
        assert!((pulse_width_ms(f32::NAN, &wide()) - 1.5).abs() < EPS);
    }

    #[test]
    fn test_duty_fraction_at_50hz() {
        // 20 ms period
        assert!((duty_fraction(1.5, 50.0) - 0.075).abs() < EPS);
        assert!((duty_fraction(0.5, 50.0) - 0.025).abs() < EPS);
        assert!((duty_fraction(2.5, 50.0) - 0.125).abs() < EPS);
    }

    #[test]
    fn test_duty_fraction_zero_frequency() {
        assert_eq!(duty_fraction(1.5, 0.0), 0.0);
    }

    #[test]
    fn test_angle_to_duty_center() {
        assert!((angle_to_duty(ANGLE_CENTER, &wide()) - 0.075).abs() < EPS);
    }

    proptest! {
        #[test]
        fn prop_below_range_is_min(angle in -1.0e6f32..=0.0) {
            let cal = wide();
            prop_assert!((pulse_width_ms(angle, &cal) - cal.min_pulse_ms).abs() < EPS);
        }

        #[test]
        fn prop_above_range_is_max(angle in 180.0f32..1.0e6) {
            let cal = wide();
            prop_assert!((pulse_width_ms(angle, &cal) - cal.max_pulse_ms).abs() < EPS);
        }

        #[test]
        fn prop_monotonic(a in -360.0f32..360.0, b in -360.0f32..360.0) {
            let cal = wide();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(pulse_width_ms(lo, &cal) <= pulse_width_ms(hi, &cal));
        }

        #[test]
        fn prop_pulse_within_calibration(angle in proptest::num::f32::ANY) {
            let cal = narrow();
            let pulse = pulse_width_ms(angle, &cal);
            prop_assert!(pulse >= cal.min_pulse_ms && pulse <= cal.max_pulse_ms);
        }

        #[test]
        fn prop_symmetric_about_center(offset in 0.0f32..=90.0) {
            let cal = wide();
            let mid = (cal.min_pulse_ms + cal.max_pulse_ms) / 2.0;
            let below = pulse_width_ms(ANGLE_CENTER - offset, &cal);
            let above = pulse_width_ms(ANGLE_CENTER + offset, &cal);
            prop_assert!(((below + above) / 2.0 - mid).abs() < 1e-4);
        }
    }
}
