//! Configuration loader
//!
//! Reads TOML from a file or the embedded default, deserializes it into
//! `SweeperConfig`, and validates it before any hardware is touched.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use pantilt_core::config::SweeperConfig;

/// Embedded default configuration (compiled into the binary)
/// Edit pantilt.toml and rebuild to change the defaults
pub const EMBEDDED_CONFIG: &str = include_str!("../../pantilt.toml");

/// Where a configuration came from
#[derive(Debug, Clone, Copy)]
pub enum ConfigSource<'a> {
    /// A file given on the command line
    File(&'a Path),
    /// The default compiled into the binary
    Embedded,
}

impl fmt::Display for ConfigSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Embedded => f.write_str("embedded defaults"),
        }
    }
}

/// Load and validate the configuration
pub fn load(source: ConfigSource<'_>) -> Result<SweeperConfig> {
    info!("Loading configuration from {}...", source);

    let config = match source {
        ConfigSource::File(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_config(&text).with_context(|| format!("in {}", path.display()))?
        }
        ConfigSource::Embedded => parse_config(EMBEDDED_CONFIG)?,
    };

    log_config_summary(&config);
    Ok(config)
}

/// Parse TOML configuration into a validated `SweeperConfig`
pub fn parse_config(input: &str) -> Result<SweeperConfig> {
    let config: SweeperConfig = toml::from_str(input).context("TOML parse error")?;
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {e}"))?;
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &SweeperConfig) {
    info!("Configuration loaded successfully");
    debug!("  pan:   {}", config.pan);
    debug!("  tilt:  {}", config.tilt);
    debug!(
        "  servo: {} Hz, {}-{} ms",
        config.servo.frequency_hz, config.servo.min_pulse_ms, config.servo.max_pulse_ms
    );
    debug!(
        "  sweep: {}° every {} ms, {} ms between passes",
        config.sweep.step_deg, config.sweep.step_delay_ms, config.sweep.pass_pause_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantilt_core::config::PwmChip;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_defaults() {
        let config = parse_config(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config, SweeperConfig::default());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(parse_config("").unwrap(), SweeperConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [servo]
            min_pulse_ms = 1.0
            max_pulse_ms = 2.0

            [sweep]
            step_deg = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.servo.frequency_hz, 50.0);
        assert_eq!(config.servo.min_pulse_ms, 1.0);
        assert_eq!(config.servo.max_pulse_ms, 2.0);
        assert_eq!(config.sweep.step_deg, 10);
        assert_eq!(config.sweep.step_delay_ms, 300);
    }

    #[test]
    fn test_path_addressing() {
        let config = parse_config(
            r#"
            [pan]
            chip = "/sys/class/pwm/pwmchip0"
            channel = 0

            [tilt]
            chip = "/sys/class/pwm/pwmchip0"
            channel = 1
            "#,
        )
        .unwrap();

        assert_eq!(
            config.pan.chip,
            PwmChip::Path("/sys/class/pwm/pwmchip0".try_into().unwrap())
        );
        assert_eq!(config.tilt.channel, 1);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = parse_config("[sweep]\nstep_deg = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("step_deg"));

        let err = parse_config("[tilt]\nchip = 0\nchannel = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("same PWM channel"));
    }

    #[test]
    fn test_rejects_overlong_chip_path() {
        let long = format!("/{}", "a".repeat(120));
        let err = parse_config(&format!("[pan]\nchip = \"{long}\"\nchannel = 0\n")).unwrap_err();
        assert!(format!("{err:#}").contains("over the 96 byte limit"));

        // Exactly at the limit still fits
        let fits = format!("/{}", "a".repeat(95));
        let config = parse_config(&format!("[pan]\nchip = \"{fits}\"\nchannel = 0\n")).unwrap();
        assert_eq!(config.pan.chip, PwmChip::Path(fits.as_str().try_into().unwrap()));
    }

    #[test]
    fn test_rejects_negative_chip_index() {
        assert!(parse_config("[pan]\nchip = -1\nchannel = 0\n").is_err());
    }

    #[test]
    fn test_rejects_index_and_path_to_same_output() {
        let err = parse_config(
            r#"
            [pan]
            chip = 0
            channel = 0

            [tilt]
            chip = "/sys/class/pwm/pwmchip0"
            channel = 0
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("same PWM channel"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(parse_config("[servo\nfrequency_hz = ").is_err());
        assert!(parse_config("[servo]\nfrequency_hz = \"fast\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sweep]\nstep_delay_ms = 50").unwrap();

        let config = load(ConfigSource::File(file.path())).unwrap();

        assert_eq!(config.sweep.step_delay_ms, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(ConfigSource::File(Path::new("/nonexistent/pantilt.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
