use nix::{ioctl_read, ioctl_write_ptr};

// linux/spi/spidev.h
pub(crate) const SPI_IOC_MAGIC: u8 = b'k';

/// struct spi_ioc_transfer
///
/// Buffer pointers are carried as u64 so the layout matches 32-bit
/// userspace on 64-bit kernels; a zero pointer tells the driver to
/// shift out zeroes (tx) or discard the incoming bytes (rx).
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub(crate) struct spi_ioc_transfer {
    pub(crate) tx_buf: u64,
    pub(crate) rx_buf: u64,
    pub(crate) len: u32,
    pub(crate) speed_hz: u32,
    pub(crate) delay_usecs: u16,
    pub(crate) bits_per_word: u8,
    pub(crate) cs_change: u8,
    pub(crate) tx_nbits: u8,
    pub(crate) rx_nbits: u8,
    pub(crate) word_delay_usecs: u8,
    pub(crate) pad: u8,
}

impl spi_ioc_transfer {
    pub(crate) const fn zeroed() -> Self {
        Self {
            tx_buf: 0,
            rx_buf: 0,
            len: 0,
            speed_hz: 0,
            delay_usecs: 0,
            bits_per_word: 0,
            cs_change: 0,
            tx_nbits: 0,
            rx_nbits: 0,
            word_delay_usecs: 0,
            pad: 0,
        }
    }
}

// SPI_IOC_MESSAGE(1): the generated request size equals one 32-byte transfer
ioctl_write_ptr!(spi_message, SPI_IOC_MAGIC, 0, spi_ioc_transfer);

ioctl_read!(spi_rd_mode, SPI_IOC_MAGIC, 1, u8);
ioctl_write_ptr!(spi_wr_mode, SPI_IOC_MAGIC, 1, u8);

ioctl_read!(spi_rd_bits_per_word, SPI_IOC_MAGIC, 3, u8);

ioctl_read!(spi_rd_max_speed_hz, SPI_IOC_MAGIC, 4, u32);
ioctl_write_ptr!(spi_wr_max_speed_hz, SPI_IOC_MAGIC, 4, u32);
