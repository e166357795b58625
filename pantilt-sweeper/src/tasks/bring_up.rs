//! Hardware bring-up
//!
//! Opens the pan channel, then the tilt channel, and installs each servo in
//! the rig as soon as it is ready. A failure stops bring-up but leaves the
//! servos already installed in place for cleanup.

use anyhow::{Context, Result};
use log::info;

use pantilt_core::config::{ChannelConfig, SweeperConfig};
use pantilt_core::traits::ServoRole;
use pantilt_drivers::{PanTilt, Servo, ServoConfig};
use pantilt_hal::{PwmChannel, PwmError};

/// Open both servos and install them in `rig`
///
/// `open` turns a configured output into a PWM channel handle.
pub fn bring_up<P, F>(rig: &mut PanTilt<P>, config: &SweeperConfig, mut open: F) -> Result<()>
where
    P: PwmChannel,
    F: FnMut(&ChannelConfig) -> Result<P, PwmError>,
{
    let servo_config = ServoConfig::from(config.servo);

    for (role, channel) in [
        (ServoRole::Pan, &config.pan),
        (ServoRole::Tilt, &config.tilt),
    ] {
        info!("Initializing {} PWM: {}", role, channel);

        let pwm = open(channel).with_context(|| format!("failed to open {role} PWM ({channel})"))?;
        let servo = Servo::new(pwm, servo_config)
            .with_context(|| format!("failed to configure {role} PWM ({channel})"))?;

        rig.attach(role, servo);
    }

    info!("PWM initialized");
    Ok(())
}
