//! SPI loopback test: jumper MOSI to MISO, send a 128-byte buffer, and
//! read the same bytes back.

use periphio::spi::{Mode, Spi};
use quicli::prelude::*;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// SPI device (default /dev/spidev1.0)
    #[structopt(long, default_value = "/dev/spidev1.0", parse(from_os_str))]
    device: PathBuf,
    /// SPI maximum clock speed in Hz
    #[structopt(long, default_value = "500000")]
    max_speed: u32,
}

fn do_main(args: Cli) -> periphio::Result<()> {
    let mut spi = Spi::open(&args.device, Mode::Mode0, args.max_speed)?;

    let mut tx = [0u8; 128];
    tx[0] = 0xFF;
    tx[127] = 0x80;
    let mut rx = [0u8; 128];
    let n = spi.transfer(Some(&tx), Some(&mut rx))?;

    println!("Transferred {n} bytes: rx[0] = 0x{:02x}, rx[127] = 0x{:02x}", rx[0], rx[127]);
    spi.close()
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args)?;
    Ok(())
}
