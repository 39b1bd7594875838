//! Stream accelerometer, gyroscope, and temperature readings from an
//! MPU-6050 over I2C.

use anyhow::Context;
use periphio::i2c::I2c;
use periphio::sensors::Mpu6050;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// I2C bus device (default /dev/i2c-0)
    #[structopt(long, default_value = "/dev/i2c-0", parse(from_os_str))]
    device: PathBuf,
    /// MPU-6050 address (default 0x68)
    #[structopt(long, default_value = "0x68", parse(try_from_str = parse_hex))]
    address: u16,
}

fn parse_hex(s: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::from_args();

    let bus = I2c::open(&args.device)
        .with_context(|| format!("opening {}", args.device.display()))?;
    let mut imu = Mpu6050::new(bus, args.address);

    // The device starts in sleep mode
    imu.wake().context("waking device")?;

    for _ in 0..100 {
        let sample = imu.read_all().context("reading sample")?;
        let [ax, ay, az] = sample.accel_g;
        let [gx, gy, gz] = sample.gyro_dps;
        println!(
            "{:.1} F | Accel x: {ax:+5.2}, y: {ay:+5.2}, z: {az:+5.2} | Gyro  x: {gx:+5.2}, y: {gy:+5.2}, z: {gz:+5.2}",
            sample.temperature_f
        );
        sleep(Duration::from_millis(500));
    }

    imu.into_bus().close()?;
    Ok(())
}
