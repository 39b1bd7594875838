//! PWM channel control through `/sys/class/pwm`.
//!
//! Ordering matters and is the kernel's to enforce, not this layer's:
//! polarity must be set while the channel is disabled, and the period must
//! be written before a non-zero duty cycle. A duty cycle exceeding the
//! current period is the kernel's EINVAL, surfaced as a configure failure.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::errors::{Error, Result};

/// Output polarity, written to the sysfs `polarity` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    Normal,
    Inversed,
}

impl Polarity {
    /// The exact strings the kernel expects.
    pub const fn as_str(self) -> &'static str {
        match self {
            Polarity::Normal => "normal",
            Polarity::Inversed => "inversed",
        }
    }
}

/// One exported channel of a PWM chip.
///
/// Export is explicit and so is release: an exported channel is system
/// state that deliberately survives the process, so nothing happens on
/// drop. Call [`unexport`](PwmChannel::unexport) to give the channel back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmChannel {
    chip: u32,
    channel: u32,
}

impl PwmChannel {
    /// Export `channel` on `pwmchip{chip}` and return a handle to it.
    ///
    /// A channel that is already exported (EBUSY) is treated as acquired.
    pub fn export(chip: u32, channel: u32) -> Result<Self> {
        let this = Self { chip, channel };
        let path = this.chip_path("export");
        match fs::write(&path, channel.to_string()) {
            Ok(()) => Ok(this),
            Err(e) if e.raw_os_error() == Some(libc::EBUSY) => Ok(this),
            Err(source) => Err(Error::Open { path, source }),
        }
    }

    pub const fn chip(&self) -> u32 {
        self.chip
    }

    pub const fn channel(&self) -> u32 {
        self.channel
    }

    /// Give the channel back to the kernel.
    pub fn unexport(self) -> Result<()> {
        fs::write(self.chip_path("unexport"), self.channel.to_string())
            .map_err(|source| Error::Close { source })
    }

    /// Start driving the output.
    pub fn enable(&self) -> Result<()> {
        self.write_attr("enable", "1")
    }

    /// Stop driving the output.
    pub fn disable(&self) -> Result<()> {
        self.write_attr("enable", "0")
    }

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.read_attr("enable")? == 1)
    }

    /// Set the period in nanoseconds.
    pub fn set_period(&self, period_ns: u64) -> Result<()> {
        self.write_attr("period", &period_ns.to_string())
    }

    pub fn period(&self) -> Result<u64> {
        self.read_attr("period")
    }

    /// Set the active time per period, in nanoseconds. Must not exceed the
    /// current period.
    pub fn set_duty_cycle(&self, duty_ns: u64) -> Result<()> {
        self.write_attr("duty_cycle", &duty_ns.to_string())
    }

    pub fn duty_cycle(&self) -> Result<u64> {
        self.read_attr("duty_cycle")
    }

    /// Set the output polarity. Only valid while the channel is disabled.
    pub fn set_polarity(&self, polarity: Polarity) -> Result<()> {
        self.write_attr("polarity", polarity.as_str())
    }

    fn chip_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("/sys/class/pwm/pwmchip{}/{name}", self.chip))
    }

    fn attr_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!(
            "/sys/class/pwm/pwmchip{}/pwm{}/{name}",
            self.chip, self.channel
        ))
    }

    fn write_attr(&self, name: &'static str, value: &str) -> Result<()> {
        fs::write(self.attr_path(name), value)
            .map_err(|source| Error::Configure {
                property: name,
                source,
            })
    }

    fn read_attr(&self, name: &'static str) -> Result<u64> {
        let raw = fs::read_to_string(self.attr_path(name)).map_err(|source| Error::Configure {
            property: name,
            source,
        })?;
        raw.trim().parse().map_err(|e| Error::Configure {
            property: name,
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysfs_paths_follow_chip_and_channel() {
        let pwm = PwmChannel {
            chip: 0,
            channel: 2,
        };
        assert_eq!(
            pwm.chip_path("export"),
            PathBuf::from("/sys/class/pwm/pwmchip0/export")
        );
        assert_eq!(
            pwm.attr_path("duty_cycle"),
            PathBuf::from("/sys/class/pwm/pwmchip0/pwm2/duty_cycle")
        );
    }

    #[test]
    fn polarity_strings_match_the_kernel_abi() {
        assert_eq!(Polarity::Normal.as_str(), "normal");
        assert_eq!(Polarity::Inversed.as_str(), "inversed");
    }
}
