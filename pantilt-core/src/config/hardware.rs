//! Hardware configuration types
//!
//! These types describe which PWM outputs the pan and tilt servos are wired
//! to. Controllers can be addressed by index or by an explicit directory.

use core::fmt;

use heapless::String;

#[cfg(feature = "serde")]
use serde::de::{self, Deserializer, Unexpected, Visitor};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of an explicit PWM controller path
pub const MAX_PATH_LEN: usize = 96;

/// Directory name prefix of a Linux PWM controller
const CHIP_PREFIX: &str = "pwmchip";

/// How a PWM controller is addressed
///
/// In TOML: an integer is an index, a string is a path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PwmChip {
    /// Controller index, resolved against the backend's root
    /// (`<root>/pwmchip<N>` on Linux)
    Index(u32),
    /// Explicit controller directory (e.g. `/sys/class/pwm/pwmchip2`)
    Path(String<MAX_PATH_LEN>),
}

impl Default for PwmChip {
    fn default() -> Self {
        PwmChip::Index(0)
    }
}

impl PwmChip {
    /// Controller index, if known
    ///
    /// Paths report the `N` of a trailing `pwmchip<N>` component, so
    /// `"/sys/class/pwm/pwmchip0"` and `0` name the same controller.
    pub fn index(&self) -> Option<u32> {
        match self {
            PwmChip::Index(n) => Some(*n),
            PwmChip::Path(p) => p
                .trim_end_matches('/')
                .rsplit('/')
                .next()?
                .strip_prefix(CHIP_PREFIX)?
                .parse()
                .ok(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PwmChip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChipVisitor;

        impl<'de> Visitor<'de> for ChipVisitor {
            type Value = PwmChip;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "a controller index or a path of at most {} bytes",
                    MAX_PATH_LEN
                )
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PwmChip, E> {
                u32::try_from(v)
                    .map(PwmChip::Index)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PwmChip, E> {
                u32::try_from(v)
                    .map(PwmChip::Index)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PwmChip, E> {
                String::try_from(v).map(PwmChip::Path).map_err(|_| {
                    E::custom(format_args!(
                        "chip path is {} bytes, over the {} byte limit",
                        v.len(),
                        MAX_PATH_LEN
                    ))
                })
            }
        }

        deserializer.deserialize_any(ChipVisitor)
    }
}

impl fmt::Display for PwmChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmChip::Index(n) => write!(f, "pwmchip{}", n),
            PwmChip::Path(p) => f.write_str(p),
        }
    }
}

/// A single servo output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// PWM controller
    pub chip: PwmChip,
    /// Channel within the controller
    pub channel: u32,
}

impl ChannelConfig {
    /// Create a channel addressed by controller index
    pub const fn indexed(chip: u32, channel: u32) -> Self {
        Self {
            chip: PwmChip::Index(chip),
            channel,
        }
    }

    /// Check if two configs drive the same output
    ///
    /// Controllers are compared by index where one can be derived, so an
    /// index and a `pwmchip<N>` path match each other. Other paths are
    /// compared as written.
    pub fn same_output(&self, other: &ChannelConfig) -> bool {
        if self.channel != other.channel {
            return false;
        }
        match (self.chip.index(), other.chip.index()) {
            (Some(a), Some(b)) => a == b,
            _ => self.chip == other.chip,
        }
    }
}

impl fmt::Display for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} channel {}", self.chip, self.channel)
    }
}
