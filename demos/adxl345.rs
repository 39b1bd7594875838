//! Stream samples from an ADXL345 accelerometer over I2C.

use anyhow::Context;
use periphio::i2c::I2c;
use periphio::sensors::adxl345::{Adxl345, Range, DATA_RATE_100_HZ};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// I2C bus device (default /dev/i2c-0)
    #[structopt(long, default_value = "/dev/i2c-0", parse(from_os_str))]
    device: PathBuf,
    /// ADXL345 address (default 0x53)
    #[structopt(long, default_value = "0x53", parse(try_from_str = parse_hex))]
    address: u16,
}

fn parse_hex(s: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::from_args();

    let bus = I2c::open(&args.device)
        .with_context(|| format!("opening {}", args.device.display()))?;
    let mut accel = Adxl345::new(bus, args.address);

    if !accel.probe().context("probing device id")? {
        println!("Not ADXL345?");
        return Ok(());
    }

    accel.power_on()?;
    accel.set_range(Range::G2)?;
    accel.set_data_rate(DATA_RATE_100_HZ)?;
    println!(
        "Range = {}, data rate = {}",
        accel.range()?,
        accel.data_rate()?
    );

    for _ in 0..100 {
        let (x, y, z) = accel.read().context("reading sample")?;
        println!("x: {x:5}, y: {y:5}, z: {z:5}");
        sleep(Duration::from_millis(500));
    }

    accel.into_bus().close()?;
    Ok(())
}
