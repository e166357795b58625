//! PWM controller resolution
//!
//! Maps the configured controller address onto a `pwmchip` directory.

use std::path::{Path, PathBuf};

use pantilt_core::config::PwmChip;

/// Where the kernel exposes PWM controllers
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/pwm";

/// Directory name prefix of a PWM controller
const CHIP_PREFIX: &str = "pwmchip";

/// Resolve a controller address to its directory
///
/// - `Index(n)` -> `<root>/pwmchip<n>`
/// - `Path(p)`  -> `p` as given (the root is ignored)
pub fn resolve_chip_dir(root: &Path, chip: &PwmChip) -> PathBuf {
    match chip {
        PwmChip::Index(n) => root.join(format!("{CHIP_PREFIX}{n}")),
        PwmChip::Path(p) => PathBuf::from(p.as_str()),
    }
}

/// Controller index of a resolved directory
///
/// Parsed from a trailing `pwmchip<N>` component. Explicit paths that do
/// not follow the kernel naming report `None`.
pub fn chip_index(chip_dir: &Path) -> Option<u32> {
    chip_dir
        .file_name()?
        .to_str()?
        .strip_prefix(CHIP_PREFIX)?
        .parse()
        .ok()
}
