//! Sysfs PWM channel
//!
//! The kernel works in absolute nanoseconds; `PwmChannel` works in
//! fractions of the period. This module keeps a cached copy of `period`
//! and `duty_cycle` so conversions never need a read-back.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use pantilt_core::config::ChannelConfig;
use pantilt_hal::{ChannelId, PwmChannel, PwmError};

use crate::chip::{chip_index, resolve_chip_dir};

/// How many times to look for the channel directory after exporting
const EXPORT_POLL_ATTEMPTS: u32 = 10;

/// Delay between export polls
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(50);

const NS_PER_S: f64 = 1_000_000_000.0;

fn map_io(e: io::Error) -> PwmError {
    match e.kind() {
        io::ErrorKind::NotFound => PwmError::NotFound,
        io::ErrorKind::PermissionDenied => PwmError::PermissionDenied,
        io::ErrorKind::InvalidInput => PwmError::InvalidValue,
        _ => PwmError::Io,
    }
}

fn read_u64(path: &Path) -> Result<u64, PwmError> {
    let raw = fs::read_to_string(path).map_err(map_io)?;
    raw.trim().parse().map_err(|_| PwmError::Parse)
}

/// One exported sysfs PWM channel
#[derive(Debug)]
pub struct SysfsPwm {
    id: ChannelId,
    chip_dir: PathBuf,
    channel_dir: PathBuf,
    /// Cached `period` (ns)
    period_ns: u64,
    /// Cached `duty_cycle` (ns)
    duty_ns: u64,
    enabled: bool,
    /// Whether this handle created the channel (and so must unexport it)
    exported: bool,
}

impl SysfsPwm {
    /// Open a channel described by configuration
    ///
    /// `root` is the sysfs class directory, normally
    /// [`crate::DEFAULT_SYSFS_ROOT`].
    pub fn open_config(root: &Path, config: &ChannelConfig) -> Result<Self, PwmError> {
        Self::open(resolve_chip_dir(root, &config.chip), config.channel)
    }

    /// Open channel `channel` of the controller at `chip_dir`
    ///
    /// Exports the channel if it is not already, then reads back its
    /// current period, duty cycle and enable state.
    pub fn open(chip_dir: impl Into<PathBuf>, channel: u32) -> Result<Self, PwmError> {
        let chip_dir = chip_dir.into();
        if !chip_dir.is_dir() {
            return Err(PwmError::NotFound);
        }

        // npwm is optional on some out-of-tree drivers
        if let Ok(npwm) = read_u64(&chip_dir.join("npwm")) {
            if u64::from(channel) >= npwm {
                return Err(PwmError::NotFound);
            }
        }

        let id = match chip_index(&chip_dir) {
            Some(chip) => ChannelId::new(chip, channel),
            None => ChannelId::unindexed(channel),
        };
        let channel_dir = chip_dir.join(format!("pwm{channel}"));

        let exported = if channel_dir.is_dir() {
            false
        } else {
            debug!("Exporting {}", channel_dir.display());
            fs::write(chip_dir.join("export"), channel.to_string()).map_err(map_io)?;
            wait_for_export(&channel_dir)?;
            // udev may still be handing the attributes to the pwm group
            let period = channel_dir.join("period");
            retry_permission(|| {
                OpenOptions::new()
                    .write(true)
                    .open(&period)
                    .map(drop)
                    .map_err(map_io)
            })?;
            true
        };

        let period_ns = read_u64(&channel_dir.join("period"))?;
        let duty_ns = read_u64(&channel_dir.join("duty_cycle"))?;
        let enabled = read_u64(&channel_dir.join("enable"))? != 0;

        Ok(Self {
            id,
            chip_dir,
            channel_dir,
            period_ns,
            duty_ns,
            enabled,
            exported,
        })
    }

    /// Channel directory (`.../pwmchip<N>/pwm<M>`)
    pub fn path(&self) -> &Path {
        &self.channel_dir
    }

    /// Cached period in nanoseconds
    pub fn period_ns(&self) -> u64 {
        self.period_ns
    }

    /// Cached duty cycle in nanoseconds
    pub fn duty_cycle_ns(&self) -> u64 {
        self.duty_ns
    }

    fn write_attr(&self, name: &str, value: u64) -> Result<(), PwmError> {
        fs::write(self.channel_dir.join(name), value.to_string()).map_err(map_io)
    }

    fn write_duty_ns(&mut self, duty_ns: u64) -> Result<(), PwmError> {
        self.write_attr("duty_cycle", duty_ns)?;
        self.duty_ns = duty_ns;
        Ok(())
    }
}

/// Wait for udev/the kernel to create the exported channel
fn wait_for_export(channel_dir: &Path) -> Result<(), PwmError> {
    for _ in 0..EXPORT_POLL_ATTEMPTS {
        if channel_dir.join("period").exists() {
            return Ok(());
        }
        thread::sleep(EXPORT_POLL_INTERVAL);
    }
    warn!("{} did not appear after export", channel_dir.display());
    Err(PwmError::ExportTimeout)
}

/// Retry `op` while it fails with `PermissionDenied`
///
/// Gives up after [`EXPORT_POLL_ATTEMPTS`] tries and returns the last error.
fn retry_permission<T>(mut op: impl FnMut() -> Result<T, PwmError>) -> Result<T, PwmError> {
    let mut attempt = 1;
    loop {
        match op() {
            Err(PwmError::PermissionDenied) if attempt < EXPORT_POLL_ATTEMPTS => {
                attempt += 1;
                thread::sleep(EXPORT_POLL_INTERVAL);
            }
            result => return result,
        }
    }
}

impl PwmChannel for SysfsPwm {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn set_frequency(&mut self, hz: f32) -> Result<(), PwmError> {
        if !(hz > 0.0) || !hz.is_finite() {
            return Err(PwmError::InvalidValue);
        }
        let period_ns = (NS_PER_S / f64::from(hz)).round() as u64;

        // The kernel rejects a period shorter than the current duty cycle
        if self.duty_ns > period_ns {
            self.write_duty_ns(0)?;
        }

        self.write_attr("period", period_ns)?;
        self.period_ns = period_ns;
        Ok(())
    }

    fn frequency(&self) -> f32 {
        if self.period_ns == 0 {
            0.0
        } else {
            (NS_PER_S / self.period_ns as f64) as f32
        }
    }

    fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), PwmError> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let duty_ns = (f64::from(fraction) * self.period_ns as f64).round() as u64;
        self.write_duty_ns(duty_ns.min(self.period_ns))
    }

    fn duty_cycle(&self) -> f32 {
        if self.period_ns == 0 {
            0.0
        } else {
            (self.duty_ns as f64 / self.period_ns as f64) as f32
        }
    }

    fn enable(&mut self) -> Result<(), PwmError> {
        self.write_attr("enable", 1)?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), PwmError> {
        self.write_attr("enable", 0)?;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn close(self) -> Result<(), PwmError> {
        if !self.exported {
            return Ok(());
        }
        debug!("Unexporting {}", self.channel_dir.display());
        fs::write(self.chip_dir.join("unexport"), self.id.channel.to_string()).map_err(map_io)
    }
}

impl embedded_hal::pwm::ErrorType for SysfsPwm {
    type Error = PwmError;
}

impl embedded_hal::pwm::SetDutyCycle for SysfsPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), PwmError> {
        let fraction = f32::from(duty) / f32::from(u16::MAX);
        PwmChannel::set_duty_cycle(self, fraction)
    }
}
