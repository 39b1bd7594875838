// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! GPIO access through the character device ABI (`/dev/gpiochipN`).
//!
//! A [`Chip`] maps to one kernel GPIO controller. Individual lines are
//! addressed by offset, requested either for output or for edge-event
//! monitoring, and released when the returned handle drops. Uses the v2
//! line uapi throughout.

#[allow(non_camel_case_types)]
pub(crate) mod uapi;

pub mod event;
pub mod line;

use std::fs::OpenOptions;
use std::os::fd::{AsFd, AsRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;

use crate::errors::{errno_to_io, Error, Result};
use crate::fixed_str::FixedStr;

pub use event::{EdgeKind, LineEvent};
pub use line::{
    watch_line_events, EdgeDetect, EventAction, EventMonitor, LineEventHandle, LineHandle,
    MonitorStatus,
};

/// A GPIO chip maps to the hardware driver instance one interacts with to
/// reach individual GPIO lines. Chips enumerate at `/dev/gpiochipN`; the
/// enumeration order is not stable across boots for bus-attached
/// controllers, so production code should match on [`ChipInfo`] fields via
/// [`chips()`] rather than hard-coding a number.
#[derive(Debug)]
pub struct Chip {
    fd: OwnedFd,
    path: PathBuf,
}

impl Chip {
    /// Open the GPIO chip at the provided path (e.g. `/dev/gpiochip0`).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::open(path, source))?;
        let this = Self {
            fd: OwnedFd::from(f),
            path: path.to_owned(),
        };
        // Anything accepting the chipinfo ioctl is a GPIO chardev
        let _ = this.info()?;
        Ok(this)
    }

    /// Open chip number `n` as `/dev/gpiochipN`.
    pub fn open_by_number(n: u32) -> Result<Self> {
        Self::open(format!("/dev/gpiochip{n}"))
    }

    /// Path this chip was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name, label, and line count reported by the kernel.
    pub fn info(&self) -> Result<ChipInfo> {
        let mut info: uapi::gpio_chip_info = unsafe { std::mem::zeroed() };
        unsafe { uapi::gpio_get_chipinfo(self.fd.as_raw_fd(), &mut info) }.map_err(|e| {
            Error::Io {
                op: "chip info",
                source: errno_to_io(e),
            }
        })?;

        Ok(ChipInfo {
            name: FixedStr::from_byte_array(info.name).map_err(invalid_name)?,
            label: FixedStr::from_byte_array(info.label).map_err(invalid_name)?,
            lines: info.lines,
        })
    }

    /// Descriptor for the line at `offset`; request it to use it.
    ///
    /// The physical pin behind an offset depends entirely on the chip's
    /// driver and the board layout.
    pub fn line(&self, offset: u32) -> Line<'_> {
        Line { chip: self, offset }
    }

    /// Close the chip, surfacing the release failure if any. Lines
    /// requested through the chip stay alive on their own descriptors.
    pub fn close(self) -> Result<()> {
        use std::os::fd::IntoRawFd;
        let fd = self.fd.into_raw_fd();
        if unsafe { libc::close(fd) } < 0 {
            return Err(Error::Close {
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

impl AsRawFd for Chip {
    #[inline(always)]
    fn as_raw_fd(&self) -> std::os::unix::prelude::RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for Chip {
    #[inline(always)]
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

fn invalid_name(e: crate::fixed_str::FixedStrErr) -> Error {
    Error::Io {
        op: "chip info",
        source: e.into(),
    }
}

/// Identity of one GPIO chip.
pub struct ChipInfo {
    name: FixedStr<{ uapi::GPIO_MAX_NAME_SIZE }>,
    label: FixedStr<{ uapi::GPIO_MAX_NAME_SIZE }>,
    lines: u32,
}

impl ChipInfo {
    /// The name of the device driving this GPIO chip in the kernel
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// A functional name for this GPIO chip, such as a product number.
    /// Might be an empty string.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// The number of lines/pins indexable through this chip
    pub const fn num_lines(&self) -> u32 {
        self.lines
    }
}

/// An unrequested line on an open chip.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    chip: &'a Chip,
    offset: u32,
}

impl Line<'_> {
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Request the line as a driven output with an initial value.
    pub fn request_output(&self, consumer: &str, initial: bool) -> Result<LineHandle> {
        line::request_output(self.chip.as_fd(), consumer, self.offset, initial)
    }

    /// Request the line for edge-event monitoring.
    pub fn request_events(&self, consumer: &str, edge: EdgeDetect) -> Result<LineEventHandle> {
        line::request_events(self.chip.as_fd(), consumer, self.offset, edge)
    }
}

/// Iterate over all GPIO chips currently present on this system.
pub fn chips() -> Result<ChipIterator> {
    Ok(ChipIterator {
        readdir: std::fs::read_dir("/dev").map_err(|source| Error::open("/dev", source))?,
    })
}

/// Iterator over chips
#[derive(Debug)]
pub struct ChipIterator {
    readdir: std::fs::ReadDir,
}

impl Iterator for ChipIterator {
    type Item = Result<Chip>;

    fn next(&mut self) -> Option<Result<Chip>> {
        for entry in &mut self.readdir {
            let e = match entry {
                Ok(e) => e,
                Err(e) => {
                    return Some(Err(Error::open("/dev", e)));
                }
            };
            let p = e.path();
            let Some(f) = p.file_name() else {
                continue;
            };
            if f.as_bytes().contains_str("gpiochip") {
                return Some(Chip::open(&p));
            }
        }

        None
    }
}
