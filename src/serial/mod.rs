//! Serial (UART) access through termios.
//!
//! Ports are opened raw: no echo, no line discipline, no flow control
//! unless requested through [`Framing`]. Reads are timed with `poll(2)` and
//! may return fewer bytes than requested; a timeout is an empty read, not an
//! error.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::sys::termios::{
    self, BaudRate, ControlFlags, InputFlags, SetArg, Termios,
};

use crate::errors::{errno_to_io, Error, Result};

mod ioc {
    nix::ioctl_read_bad!(fionread, libc::FIONREAD, libc::c_int);
}

/// Parity bit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

/// Extended framing parameters for [`Serial::open_with`].
#[derive(Debug, Clone, Copy)]
pub struct Framing {
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    pub xonxoff: bool,
    pub rtscts: bool,
}

impl Default for Framing {
    /// 8 data bits, no parity, 1 stop bit, no flow control.
    fn default() -> Self {
        Self {
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            xonxoff: false,
            rtscts: false,
        }
    }
}

/// An open serial port handle.
#[derive(Debug)]
pub struct Serial {
    dev: File,
    path: PathBuf,
}

impl Serial {
    /// Open a serial device (e.g. `/dev/ttyS0`) with default 8N1 framing.
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> Result<Self> {
        Self::open_with(path, baud_rate, Framing::default())
    }

    /// Open a serial device with explicit framing parameters.
    pub fn open_with(path: impl AsRef<Path>, baud_rate: u32, framing: Framing) -> Result<Self> {
        let path = path.as_ref();
        let speed = baud_to_speed(baud_rate)?;

        let dev = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)
            .map_err(|source| Error::open(path, source))?;

        let mut tio =
            termios::tcgetattr(dev.as_fd()).map_err(|e| Error::configure("terminal attributes", e))?;
        termios::cfmakeraw(&mut tio);
        apply_framing(&mut tio, framing)?;
        termios::cfsetspeed(&mut tio, speed).map_err(|e| Error::configure("baud rate", e))?;
        termios::tcsetattr(dev.as_fd(), SetArg::TCSANOW, &tio)
            .map_err(|e| Error::configure("terminal attributes", e))?;

        Ok(Self {
            dev,
            path: path.to_owned(),
        })
    }

    /// Path this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocking write. Returns the number of bytes accepted, which may be
    /// short for large buffers.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.dev.write(buf).map_err(|source| Error::Io {
            op: "serial write",
            source,
        })
    }

    /// Read into `buf`, waiting up to `timeout` for data to arrive.
    ///
    /// Returns `Ok(0)` when the timeout elapses with nothing to read;
    /// otherwise returns whatever one `read(2)` produced, which may be fewer
    /// bytes than `buf` holds. `None` blocks indefinitely.
    pub fn read(&mut self, buf: &mut [u8], timeout: Option<Duration>) -> Result<usize> {
        let readable =
            crate::poll::wait_for_readable(self.dev.as_fd(), timeout).map_err(|source| {
                Error::Io {
                    op: "serial poll",
                    source,
                }
            })?;
        if !readable {
            return Ok(0);
        }
        self.dev.read(buf).map_err(|source| Error::Io {
            op: "serial read",
            source,
        })
    }

    /// Block until all queued output has been transmitted.
    pub fn flush(&mut self) -> Result<()> {
        termios::tcdrain(self.dev.as_fd()).map_err(|e| Error::Io {
            op: "serial drain",
            source: errno_to_io(e),
        })
    }

    /// Number of bytes waiting in the input queue.
    pub fn input_waiting(&self) -> Result<usize> {
        let mut count: libc::c_int = 0;
        unsafe { ioc::fionread(self.dev.as_raw_fd(), &mut count) }.map_err(|e| Error::Io {
            op: "serial input query",
            source: errno_to_io(e),
        })?;
        Ok(count as usize)
    }

    /// Close the port, surfacing the release failure if any.
    pub fn close(self) -> Result<()> {
        use std::os::fd::IntoRawFd;
        let fd = self.dev.into_raw_fd();
        if unsafe { libc::close(fd) } < 0 {
            return Err(Error::Close {
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

fn apply_framing(tio: &mut Termios, framing: Framing) -> Result<()> {
    tio.control_flags |= ControlFlags::CREAD | ControlFlags::CLOCAL;

    tio.control_flags &= !ControlFlags::CSIZE;
    tio.control_flags |= match framing.data_bits {
        5 => ControlFlags::CS5,
        6 => ControlFlags::CS6,
        7 => ControlFlags::CS7,
        8 => ControlFlags::CS8,
        n => return Err(Error::Argument(format!("unsupported data bits: {n}"))),
    };

    match framing.stop_bits {
        1 => tio.control_flags &= !ControlFlags::CSTOPB,
        2 => tio.control_flags |= ControlFlags::CSTOPB,
        n => return Err(Error::Argument(format!("unsupported stop bits: {n}"))),
    }

    match framing.parity {
        Parity::None => tio.control_flags &= !ControlFlags::PARENB,
        Parity::Odd => tio.control_flags |= ControlFlags::PARENB | ControlFlags::PARODD,
        Parity::Even => {
            tio.control_flags |= ControlFlags::PARENB;
            tio.control_flags &= !ControlFlags::PARODD;
        }
    }

    if framing.xonxoff {
        tio.input_flags |= InputFlags::IXON | InputFlags::IXOFF;
    } else {
        tio.input_flags &= !(InputFlags::IXON | InputFlags::IXOFF);
    }

    if framing.rtscts {
        tio.control_flags |= ControlFlags::CRTSCTS;
    } else {
        tio.control_flags &= !ControlFlags::CRTSCTS;
    }

    Ok(())
}

fn baud_to_speed(baud_rate: u32) -> Result<BaudRate> {
    let speed = match baud_rate {
        1200 => BaudRate::B1200,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        230400 => BaudRate::B230400,
        460800 => BaudRate::B460800,
        500000 => BaudRate::B500000,
        921600 => BaudRate::B921600,
        1000000 => BaudRate::B1000000,
        1500000 => BaudRate::B1500000,
        2000000 => BaudRate::B2000000,
        other => {
            return Err(Error::Argument(format!(
                "unsupported baud rate: {other}"
            )))
        }
    };
    Ok(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_baud_rates_are_supported() {
        for rate in [9600u32, 19200, 38400, 57600, 115200, 230400] {
            assert!(baud_to_speed(rate).is_ok(), "rate {rate}");
        }
    }

    #[test]
    fn unsupported_baud_rate_is_an_argument_error() {
        assert!(matches!(baud_to_speed(12345), Err(Error::Argument(_))));
        assert!(matches!(baud_to_speed(0), Err(Error::Argument(_))));
    }

    #[test]
    fn default_framing_is_8n1() {
        let f = Framing::default();
        assert_eq!(f.data_bits, 8);
        assert_eq!(f.stop_bits, 1);
        assert_eq!(f.parity, Parity::None);
        assert!(!f.xonxoff && !f.rtscts);
    }
}
