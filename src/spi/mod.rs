//! SPI bus access through the `/dev/spidevX.Y` character device.

#[allow(non_camel_case_types)]
pub(crate) mod uapi;

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// SPI clock phase/polarity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
}

impl Mode {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Mode::Mode0,
            1 => Mode::Mode1,
            2 => Mode::Mode2,
            _ => Mode::Mode3,
        }
    }
}

/// An open SPI bus handle with mode and clock speed applied.
#[derive(Debug)]
pub struct Spi {
    dev: File,
    path: PathBuf,
}

impl Spi {
    /// Open an SPI device (e.g. `/dev/spidev1.0`) and configure its mode
    /// and maximum clock speed in Hz.
    pub fn open(path: impl AsRef<Path>, mode: Mode, max_speed_hz: u32) -> Result<Self> {
        let path = path.as_ref();
        let dev = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::open(path, source))?;

        let spi = Self {
            dev,
            path: path.to_owned(),
        };

        let mode_bits = mode.bits();
        unsafe { uapi::spi_wr_mode(spi.dev.as_raw_fd(), &mode_bits) }
            .map_err(|e| Error::configure("SPI mode", e))?;
        unsafe { uapi::spi_wr_max_speed_hz(spi.dev.as_raw_fd(), &max_speed_hz) }
            .map_err(|e| Error::configure("SPI max speed", e))?;

        Ok(spi)
    }

    /// Path this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back the mode the driver is using.
    pub fn mode(&self) -> Result<Mode> {
        let mut bits = 0u8;
        unsafe { uapi::spi_rd_mode(self.dev.as_raw_fd(), &mut bits) }
            .map_err(|e| Error::configure("SPI mode", e))?;
        Ok(Mode::from_bits(bits))
    }

    /// Read back the configured maximum clock speed in Hz.
    pub fn max_speed_hz(&self) -> Result<u32> {
        let mut speed = 0u32;
        unsafe { uapi::spi_rd_max_speed_hz(self.dev.as_raw_fd(), &mut speed) }
            .map_err(|e| Error::configure("SPI max speed", e))?;
        Ok(speed)
    }

    /// Read back the word size in bits (0 means the 8-bit default).
    pub fn bits_per_word(&self) -> Result<u8> {
        let mut bits = 0u8;
        unsafe { uapi::spi_rd_bits_per_word(self.dev.as_raw_fd(), &mut bits) }
            .map_err(|e| Error::configure("SPI bits per word", e))?;
        Ok(bits)
    }

    /// Full-duplex transfer.
    ///
    /// The exchange length is the common length of the buffers supplied.
    /// With only `tx`, the incoming bytes are discarded by the driver; with
    /// only `rx`, zeroes are shifted out while `rx` fills. Supplying
    /// neither, or two buffers of different lengths, is a caller contract
    /// violation reported as [`Error::Argument`]. Returns the number of
    /// bytes exchanged.
    pub fn transfer(&mut self, tx: Option<&[u8]>, rx: Option<&mut [u8]>) -> Result<usize> {
        let len = transfer_len(tx.map(<[u8]>::len), rx.as_deref().map(<[u8]>::len))?;

        let mut xfer = uapi::spi_ioc_transfer::zeroed();
        xfer.len = len as u32;
        if let Some(tx) = tx {
            xfer.tx_buf = tx.as_ptr() as u64;
        }
        if let Some(rx) = rx {
            xfer.rx_buf = rx.as_mut_ptr() as u64;
        }

        unsafe { uapi::spi_message(self.dev.as_raw_fd(), &xfer) }.map_err(Error::transfer)?;
        Ok(len)
    }

    /// Close the bus, surfacing the release failure if any.
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

fn transfer_len(tx: Option<usize>, rx: Option<usize>) -> Result<usize> {
    match (tx, rx) {
        (None, None) => Err(Error::Argument(
            "transmit and receive buffers cannot both be absent".into(),
        )),
        (Some(t), Some(r)) if t != r => Err(Error::Argument(format!(
            "transmit and receive buffer lengths differ: {t} != {r}"
        ))),
        (Some(t), _) => Ok(t),
        (None, Some(r)) => Ok(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_requires_at_least_one_buffer() {
        assert!(matches!(
            transfer_len(None, None),
            Err(Error::Argument(_))
        ));
    }

    #[test]
    fn transfer_length_follows_the_supplied_buffer() {
        assert_eq!(transfer_len(Some(128), None).unwrap(), 128);
        assert_eq!(transfer_len(None, Some(128)).unwrap(), 128);
        assert_eq!(transfer_len(Some(16), Some(16)).unwrap(), 16);
    }

    #[test]
    fn mismatched_buffer_lengths_are_rejected() {
        assert!(matches!(
            transfer_len(Some(16), Some(32)),
            Err(Error::Argument(_))
        ));
    }

    #[test]
    fn mode_bits_round_trip() {
        for mode in [Mode::Mode0, Mode::Mode1, Mode::Mode2, Mode::Mode3] {
            assert_eq!(Mode::from_bits(mode.bits()), mode);
        }
        // upper flag bits (e.g. SPI_CS_HIGH) do not disturb the phase bits
        assert_eq!(Mode::from_bits(0x07), Mode::Mode3);
    }
}
