//! Serial loopback test: write a 128-byte buffer and read it back.
//!
//! Without real hardware, socat provides a loopback pair:
//!
//! ```text
//! sudo socat PTY,link=/dev/ttyS10 PTY,link=/dev/ttyS11
//! ```

use periphio::serial::Serial;
use quicli::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// Serial device (default /dev/ttyS10)
    #[structopt(long, default_value = "/dev/ttyS10", parse(from_os_str))]
    device: PathBuf,
    /// Baud rate
    #[structopt(long, default_value = "115200")]
    baud_rate: u32,
}

fn do_main(args: Cli) -> periphio::Result<()> {
    let mut serial = Serial::open(&args.device, args.baud_rate)?;

    let mut tx = [0u8; 128];
    tx[0] = 0xFF;
    tx[127] = 0x80;
    let sent = serial.write(&tx)?;
    println!("Sent {sent} bytes");
    serial.flush()?;

    let mut rx = [0u8; 128];
    let received = serial.read(&mut rx, Some(Duration::from_millis(2000)))?;
    println!("Received {received} bytes: rx[0] = 0x{:02x}", rx[0]);
    serial.close()
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args)?;
    Ok(())
}
