//! Pantilt - Servo Sweep Controller
//!
//! Drives a pan/tilt servo pair through Linux sysfs PWM. The pan servo
//! sweeps 0-180° back and forth while the tilt servo holds center.
//!
//! On SIGINT/SIGTERM, or if anything fails after the configuration is
//! loaded, both servos are re-centered, disabled and released before the
//! process exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use pantilt_drivers::PanTilt;
use pantilt_hal_sysfs::{SysfsPwm, DEFAULT_SYSFS_ROOT};

use crate::config::ConfigSource;
use crate::shutdown::{ShutdownListener, StdDelay};

mod config;
mod shutdown;
mod tasks;

/// Sweep a pan/tilt servo pair over sysfs PWM
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file (defaults are built in)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the pwmchip<N> controllers
    #[arg(long, default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Pantilt sweeper starting...");

    let source = match &args.config {
        Some(path) => ConfigSource::File(path),
        None => ConfigSource::Embedded,
    };
    let config = config::load(source)?;

    let mut listener =
        ShutdownListener::install().context("failed to install signal handler")?;

    let mut rig: PanTilt<SysfsPwm> = PanTilt::new();

    let run = tasks::bring_up(&mut rig, &config, |channel| {
        SysfsPwm::open_config(&args.sysfs_root, channel)
    })
    .and_then(|()| tasks::sweep(&mut rig, &config.sweep, &mut listener));

    if let Err(e) = run {
        error!("{e:#}");
    }

    info!("Cleaning up...");
    let report = rig.shutdown(&mut StdDelay, config.sweep.center_delay_ms);
    for failure in &report.failures {
        warn!(
            "{} {:?} failed: {}",
            failure.role, failure.step, failure.error
        );
    }
    for role in &report.released {
        info!("{} PWM released", role);
    }

    info!("Cleanup complete");
    Ok(())
}
