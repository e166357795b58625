//! Pan sweep loop
//!
//! Centers both servos, then drives the pan servo back and forth across
//! 0-180° while tilt stays at 90°. Runs until a wait reports shutdown.

use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use pantilt_core::config::SweepConfig;
use pantilt_core::sweep::{Sweep, SweepEvent};
use pantilt_core::traits::{ServoDriver, ServoRole};
use pantilt_drivers::PanTilt;
use pantilt_hal::PwmChannel;

use crate::shutdown::Hold;

fn ms(value: u32) -> Duration {
    Duration::from_millis(value.into())
}

/// Center both servos and sweep pan until shutdown is requested
///
/// Returns `Ok` on a shutdown request, `Err` if a servo write fails. The
/// rig is left as-is either way; cleanup belongs to the caller.
pub fn sweep<P, H>(rig: &mut PanTilt<P>, config: &SweepConfig, hold: &mut H) -> Result<()>
where
    P: PwmChannel,
    H: Hold,
{
    info!("Centering servos");
    for role in [ServoRole::Pan, ServoRole::Tilt] {
        rig.servo_mut(role)
            .ok_or_else(|| anyhow!("{role} servo is not initialized"))?
            .center()
            .with_context(|| format!("failed to center {role} servo"))?;
    }
    if hold.hold(ms(config.center_delay_ms)).is_break() {
        return Ok(());
    }

    info!("Sweeping pan in {}° steps. Press Ctrl+C to stop", config.step_deg);

    let pan = rig
        .servo_mut(ServoRole::Pan)
        .ok_or_else(|| anyhow!("pan servo is not initialized"))?;

    for event in Sweep::new(config.step_deg) {
        let flow = match event {
            SweepEvent::Move(angle) => {
                pan.set_angle(f32::from(angle))
                    .with_context(|| format!("failed to move pan servo to {angle}°"))?;
                info!("Pan -> {:3}°", angle);
                hold.hold(ms(config.step_delay_ms))
            }
            SweepEvent::PassComplete(direction) => {
                debug!("{:?} pass complete", direction);
                hold.hold(ms(config.pass_pause_ms))
            }
        };

        if let ControlFlow::Break(()) = flow {
            info!("Shutdown requested");
            return Ok(());
        }
    }

    Ok(())
}
