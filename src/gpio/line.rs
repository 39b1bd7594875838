// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::io::Read;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Duration;

use crate::errors::{errno_to_io, Error, Result};
use crate::fixed_str::FixedStr;
use crate::gpio::event::LineEvent;
use crate::gpio::uapi::{self, LineFlags};

/// Which edges an event request subscribes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeDetect {
    Rising,
    Falling,
    #[default]
    Both,
}

impl EdgeDetect {
    pub(crate) const fn flags(self) -> LineFlags {
        match self {
            EdgeDetect::Rising => LineFlags::EDGE_RISING,
            EdgeDetect::Falling => LineFlags::EDGE_FALLING,
            EdgeDetect::Both => LineFlags::EDGE_RISING.union(LineFlags::EDGE_FALLING),
        }
    }
}

fn request(
    chip: BorrowedFd<'_>,
    consumer: &str,
    offset: u32,
    flags: LineFlags,
    initial: Option<bool>,
) -> Result<File> {
    let consumer = FixedStr::<{ uapi::GPIO_MAX_NAME_SIZE }>::new(consumer)
        .map_err(|e| Error::Argument(e.to_string()))?;

    let mut req = uapi::gpio_line_request::zeroed();
    req.num_lines = 1;
    req.offsets[0] = offset;
    req.config.flags = flags;
    req.consumer = consumer.into_byte_array();

    if let Some(value) = initial {
        req.config.num_attrs = 1;
        req.config.attrs[0].write(uapi::gpio_line_config_attribute {
            attr: uapi::gpio_line_attribute {
                id: uapi::LineAttrId::OUTPUT_VALUES,
                _padding: 0,
                attribute: uapi::gpio_line_attribute_union {
                    values: value as u64,
                },
            },
            mask: 1,
        });
    }

    unsafe { uapi::gpio_get_line(chip.as_raw_fd(), &mut req) }.map_err(|e| Error::Io {
        op: "line request",
        source: errno_to_io(e),
    })?;

    Ok(unsafe { File::from_raw_fd(req.fd) })
}

pub(crate) fn request_output(
    chip: BorrowedFd<'_>,
    consumer: &str,
    offset: u32,
    initial: bool,
) -> Result<LineHandle> {
    let fd = request(chip, consumer, offset, LineFlags::OUTPUT, Some(initial))?;
    Ok(LineHandle { fd, offset })
}

pub(crate) fn request_events(
    chip: BorrowedFd<'_>,
    consumer: &str,
    offset: u32,
    edge: EdgeDetect,
) -> Result<LineEventHandle> {
    let flags = LineFlags::INPUT | edge.flags();
    let fd = request(chip, consumer, offset, flags, None)?;
    Ok(LineEventHandle { fd, offset })
}

fn release(fd: File) -> Result<()> {
    use std::os::fd::IntoRawFd;
    let fd = fd.into_raw_fd();
    if unsafe { libc::close(fd) } < 0 {
        return Err(Error::Close {
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}

/// A line requested for output.
///
/// The handle owns the line request fd; the kernel releases the line when
/// the handle drops. Values set through the handle are observable through
/// [`get_value`](LineHandle::get_value) without re-requesting.
#[derive(Debug)]
pub struct LineHandle {
    fd: File,
    offset: u32,
}

impl LineHandle {
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Drive the line active (`true`) or inactive (`false`).
    pub fn set_value(&mut self, value: bool) -> Result<()> {
        let mut data = uapi::gpio_line_values {
            bits: value as u64,
            mask: 1,
        };
        unsafe { uapi::gpio_line_set_values(self.fd.as_raw_fd(), &mut data) }.map_err(|e| {
            Error::Io {
                op: "line set value",
                source: errno_to_io(e),
            }
        })?;
        Ok(())
    }

    /// Read the line's current value back.
    pub fn get_value(&self) -> Result<bool> {
        let mut data = uapi::gpio_line_values { bits: 0, mask: 1 };
        unsafe { uapi::gpio_line_get_values(self.fd.as_raw_fd(), &mut data) }.map_err(|e| {
            Error::Io {
                op: "line get value",
                source: errno_to_io(e),
            }
        })?;
        Ok(data.bits & 1 != 0)
    }

    /// Release the line, surfacing the failure if any.
    pub fn release(self) -> Result<()> {
        release(self.fd)
    }
}

/// A line requested for edge-event monitoring.
#[derive(Debug)]
pub struct LineEventHandle {
    fd: File,
    offset: u32,
}

impl LineEventHandle {
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Block until an edge event arrives or `timeout` elapses.
    ///
    /// `Ok(None)` is a timeout; `None` as the timeout blocks indefinitely.
    pub fn wait(&mut self, timeout: Option<Duration>) -> Result<Option<LineEvent>> {
        let readable =
            crate::poll::wait_for_readable(self.fd.as_fd(), timeout).map_err(|source| {
                Error::Io {
                    op: "event wait",
                    source,
                }
            })?;
        if !readable {
            return Ok(None);
        }
        self.read_event().map(Some)
    }

    /// Read one complete event record off the request fd.
    fn read_event(&mut self) -> Result<LineEvent> {
        let mut buf = [0; std::mem::size_of::<uapi::gpio_line_event>()];
        let mut filled = 0;

        while filled < buf.len() {
            match self.fd.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::Io {
                        op: "event read",
                        source: std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "line request fd closed",
                        ),
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => (),
                Err(source) => {
                    return Err(Error::Io {
                        op: "event read",
                        source,
                    })
                }
            }
        }

        let data = unsafe { uapi::gpio_line_event::from_bytes(buf) };
        LineEvent::from_v2(data).map_err(|source| Error::Io {
            op: "event read",
            source,
        })
    }

    /// Release the line, surfacing the failure if any.
    pub fn release(self) -> Result<()> {
        release(self.fd)
    }
}

/// What an event handler wants the polling loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Continue,
    Stop,
}

/// Error type handlers may return to stop a polling loop.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Open a chip, request a line for edge events, and invoke `handler` for
/// each event until it signals [`EventAction::Stop`], it fails, or the
/// timeout elapses with no event. On timeout the handler is invoked one
/// final time with `None` before the loop returns.
///
/// Handler failures — returned errors and panics alike — are contained and
/// reported as [`Error::Handler`]; they never propagate into the polling
/// primitive. The line is released and the chip closed before this returns.
pub fn watch_line_events<F>(
    chip: impl AsRef<Path>,
    offset: u32,
    edge: EdgeDetect,
    consumer: &str,
    timeout: Option<Duration>,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(Option<&LineEvent>) -> std::result::Result<EventAction, HandlerError>,
{
    let chip = super::Chip::open(chip)?;
    let mut events = chip.line(offset).request_events(consumer, edge)?;

    loop {
        let event = events.wait(timeout)?;
        let action = match catch_unwind(AssertUnwindSafe(|| handler(event.as_ref()))) {
            Ok(Ok(action)) => action,
            Ok(Err(source)) => return Err(Error::Handler { source }),
            Err(_) => {
                return Err(Error::Handler {
                    source: "event handler panicked".into(),
                })
            }
        };

        match (event, action) {
            (None, _) | (Some(_), EventAction::Stop) => return Ok(()),
            (Some(_), EventAction::Continue) => (),
        }
    }
}

/// Completion status of an [`EventMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    /// The wait timed out with no event pending.
    TimedOut,
    /// The handler asked to stop.
    Stopped,
}

/// Background worker that owns a [`LineEventHandle`] for the duration of
/// its polling loop.
///
/// The initiating flow continues independently and must [`join`] the worker
/// to get the handle back before releasing the line or closing shared chip
/// resources.
///
/// [`join`]: EventMonitor::join
#[derive(Debug)]
pub struct EventMonitor {
    thread: std::thread::JoinHandle<(LineEventHandle, Result<MonitorStatus>)>,
}

impl EventMonitor {
    /// Move `events` to a worker thread that waits for edges and feeds them
    /// to `handler` until it returns [`EventAction::Stop`], a wait times
    /// out, or a wait/read fails.
    pub fn spawn<F>(
        mut events: LineEventHandle,
        timeout: Option<Duration>,
        mut handler: F,
    ) -> Self
    where
        F: FnMut(&LineEvent) -> EventAction + Send + 'static,
    {
        let thread = std::thread::spawn(move || {
            let status = loop {
                match events.wait(timeout) {
                    Ok(None) => break Ok(MonitorStatus::TimedOut),
                    Ok(Some(event)) => {
                        if handler(&event) == EventAction::Stop {
                            break Ok(MonitorStatus::Stopped);
                        }
                    }
                    Err(e) => break Err(e),
                }
            };
            (events, status)
        });
        Self { thread }
    }

    /// True once the worker's loop has ended.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Join the worker, returning the line handle and how the loop ended.
    pub fn join(self) -> Result<(LineEventHandle, MonitorStatus)> {
        match self.thread.join() {
            Ok((events, Ok(status))) => Ok((events, status)),
            Ok((_, Err(e))) => Err(e),
            Err(_) => Err(Error::Handler {
                source: "event monitor thread panicked".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_detect_maps_to_v2_flags() {
        assert_eq!(EdgeDetect::Rising.flags(), LineFlags::EDGE_RISING);
        assert_eq!(EdgeDetect::Falling.flags(), LineFlags::EDGE_FALLING);
        assert_eq!(
            EdgeDetect::Both.flags(),
            LineFlags::EDGE_RISING | LineFlags::EDGE_FALLING
        );
    }
}
