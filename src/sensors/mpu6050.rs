//! MPU-6050 triple-axis accelerometer + gyroscope, driven over I2C.

use crate::errors::Result;
use crate::i2c::RegisterBus;

const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT: u8 = 0x3B;
const REG_ACCEL_YOUT: u8 = 0x3D;
const REG_ACCEL_ZOUT: u8 = 0x3F;
const REG_TEMP_OUT: u8 = 0x41;
const REG_GYRO_XOUT: u8 = 0x43;
const REG_GYRO_YOUT: u8 = 0x45;
const REG_GYRO_ZOUT: u8 = 0x47;
const REG_PWR_MGMT_1: u8 = 0x6B;

const EARTH_GRAVITY_MS2: f64 = 9.80665;

/// Default accelerometer scale, LSB per g at ±2 g.
pub const ACCEL_SCALE_DEFAULT: f64 = 16384.0;
/// Default gyroscope scale, LSB per °/s at ±250 °/s.
pub const GYRO_SCALE_DEFAULT: f64 = 131.0;

/// Accelerometer full-scale range, the raw ACCEL_CONFIG values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AccelRange {
    G2 = 0x00,
    G4 = 0x08,
    G8 = 0x10,
    G16 = 0x18,
}

/// Gyroscope full-scale range, the raw GYRO_CONFIG values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GyroRange {
    Dps250 = 0x00,
    Dps500 = 0x08,
    Dps1000 = 0x10,
    Dps2000 = 0x18,
}

/// LSB-per-g divisor for a raw ACCEL_CONFIG value.
///
/// Unrecognized values fall back to the widest documented scale with a
/// warning rather than failing, so sample streams survive a transient
/// configuration mis-read. Strict callers can inspect
/// [`accel_range_raw`](Mpu6050::accel_range_raw) themselves.
pub fn accel_scale(raw: u8) -> f64 {
    match raw {
        0x00 => 16384.0,
        0x08 => 8192.0,
        0x10 => 4096.0,
        0x18 => 2048.0,
        other => {
            log::warn!(
                "unknown accelerometer range 0x{other:02x}, assuming scale {ACCEL_SCALE_DEFAULT}"
            );
            ACCEL_SCALE_DEFAULT
        }
    }
}

/// LSB-per-°/s divisor for a raw GYRO_CONFIG value; same fallback policy as
/// [`accel_scale`].
pub fn gyro_scale(raw: u8) -> f64 {
    match raw {
        0x00 => 131.0,
        0x08 => 65.5,
        0x10 => 32.8,
        0x18 => 16.4,
        other => {
            log::warn!(
                "unknown gyroscope range 0x{other:02x}, assuming scale {GYRO_SCALE_DEFAULT}"
            );
            GYRO_SCALE_DEFAULT
        }
    }
}

/// One full reading: acceleration in g, angular rate in °/s, temperature in
/// degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub accel_g: [f64; 3],
    pub gyro_dps: [f64; 3],
    pub temperature_f: f64,
}

pub struct Mpu6050<B> {
    bus: B,
    address: u16,
}

impl<B: RegisterBus> Mpu6050<B> {
    pub fn new(bus: B, address: u16) -> Self {
        Self { bus, address }
    }

    /// The device powers up asleep; clear PWR_MGMT_1 to start sampling.
    pub fn wake(&mut self) -> Result<()> {
        self.bus.write_register(self.address, REG_PWR_MGMT_1, 0x00)
    }

    /// Die temperature in degrees Fahrenheit, per the register map formula
    /// raw/340 + 36.53 °C.
    pub fn temperature_f(&mut self) -> Result<f64> {
        let raw = self.bus.read_word(self.address, REG_TEMP_OUT)?;
        let celsius = raw as f64 / 340.0 + 36.53;
        Ok(1.8 * celsius + 32.0)
    }

    /// Set the accelerometer range. The register is zeroed first so the
    /// written value is the whole configuration.
    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<()> {
        self.bus.write_register(self.address, REG_ACCEL_CONFIG, 0x00)?;
        self.bus
            .write_register(self.address, REG_ACCEL_CONFIG, range as u8)
    }

    /// The raw ACCEL_CONFIG register value.
    pub fn accel_range_raw(&mut self) -> Result<u8> {
        self.bus.read_register(self.address, REG_ACCEL_CONFIG)
    }

    /// Set the gyroscope range, zeroing the register first.
    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<()> {
        self.bus.write_register(self.address, REG_GYRO_CONFIG, 0x00)?;
        self.bus
            .write_register(self.address, REG_GYRO_CONFIG, range as u8)
    }

    /// The raw GYRO_CONFIG register value.
    pub fn gyro_range_raw(&mut self) -> Result<u8> {
        self.bus.read_register(self.address, REG_GYRO_CONFIG)
    }

    /// Acceleration on (x, y, z) in g.
    pub fn accel_g(&mut self) -> Result<[f64; 3]> {
        let x = self.bus.read_word(self.address, REG_ACCEL_XOUT)?;
        let y = self.bus.read_word(self.address, REG_ACCEL_YOUT)?;
        let z = self.bus.read_word(self.address, REG_ACCEL_ZOUT)?;
        let scale = accel_scale(self.accel_range_raw()?);
        Ok([x as f64 / scale, y as f64 / scale, z as f64 / scale])
    }

    /// Acceleration on (x, y, z) in m/s².
    pub fn accel_ms2(&mut self) -> Result<[f64; 3]> {
        let g = self.accel_g()?;
        Ok(g.map(|v| v * EARTH_GRAVITY_MS2))
    }

    /// Angular rate on (x, y, z) in °/s.
    pub fn gyro_dps(&mut self) -> Result<[f64; 3]> {
        let x = self.bus.read_word(self.address, REG_GYRO_XOUT)?;
        let y = self.bus.read_word(self.address, REG_GYRO_YOUT)?;
        let z = self.bus.read_word(self.address, REG_GYRO_ZOUT)?;
        let scale = gyro_scale(self.gyro_range_raw()?);
        Ok([x as f64 / scale, y as f64 / scale, z as f64 / scale])
    }

    /// Everything the device measures, in one call.
    pub fn read_all(&mut self) -> Result<Sample> {
        Ok(Sample {
            accel_g: self.accel_g()?,
            gyro_dps: self.gyro_dps()?,
            temperature_f: self.temperature_f()?,
        })
    }

    /// Hand the bus back.
    pub fn into_bus(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::mock::MockBus;

    const ADDR: u16 = 0x68;

    #[test]
    fn accel_scale_table_is_exact() {
        assert_eq!(accel_scale(0x00), 16384.0);
        assert_eq!(accel_scale(0x08), 8192.0);
        assert_eq!(accel_scale(0x10), 4096.0);
        assert_eq!(accel_scale(0x18), 2048.0);
    }

    #[test]
    fn unknown_ranges_fall_back_to_the_default_scale() {
        assert_eq!(accel_scale(0x01), ACCEL_SCALE_DEFAULT);
        assert_eq!(accel_scale(0xFF), ACCEL_SCALE_DEFAULT);
        assert_eq!(gyro_scale(0x05), GYRO_SCALE_DEFAULT);
    }

    #[test]
    fn gyro_scale_table_is_exact() {
        assert_eq!(gyro_scale(0x00), 131.0);
        assert_eq!(gyro_scale(0x08), 65.5);
        assert_eq!(gyro_scale(0x10), 32.8);
        assert_eq!(gyro_scale(0x18), 16.4);
    }

    #[test]
    fn set_accel_range_zeroes_then_writes() {
        let bus = MockBus::default();
        let mut imu = Mpu6050::new(bus, ADDR);
        imu.set_accel_range(AccelRange::G8).unwrap();
        assert_eq!(imu.accel_range_raw().unwrap(), 0x10);
    }

    #[test]
    fn accel_in_g_divides_by_the_configured_scale() {
        let mut bus = MockBus::default();
        // x = 0x4000 = 16384, y = 0x2000, z = 0 at +-2g
        bus.load(ADDR, REG_ACCEL_XOUT, &[0x40, 0x00, 0x20, 0x00, 0x00, 0x00]);
        bus.regs.insert((ADDR, REG_ACCEL_CONFIG), 0x00);
        let mut imu = Mpu6050::new(bus, ADDR);
        let [x, y, z] = imu.accel_g().unwrap();
        assert_eq!(x, 1.0);
        assert_eq!(y, 0.5);
        assert_eq!(z, 0.0);

        let [x_ms2, _, _] = imu.accel_ms2().unwrap();
        assert!((x_ms2 - 9.80665).abs() < 1e-12);
    }

    #[test]
    fn gyro_in_dps_divides_by_the_configured_scale() {
        let mut bus = MockBus::default();
        // x = 131 LSB = 1 deg/s at +-250 deg/s
        bus.load(ADDR, REG_GYRO_XOUT, &[0x00, 0x83, 0x00, 0x00, 0x00, 0x00]);
        bus.regs.insert((ADDR, REG_GYRO_CONFIG), 0x00);
        let mut imu = Mpu6050::new(bus, ADDR);
        let [x, y, z] = imu.gyro_dps().unwrap();
        assert!((x - 1.0).abs() < 1e-12);
        assert_eq!(y, 0.0);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn temperature_uses_the_register_map_formula() {
        // raw 0 -> 36.53 C -> 97.754 F
        let bus = MockBus::default();
        let mut imu = Mpu6050::new(bus, ADDR);
        let f = imu.temperature_f().unwrap();
        assert!((f - (1.8 * 36.53 + 32.0)).abs() < 1e-12);
    }

    #[test]
    fn negative_samples_survive_the_word_read() {
        let mut bus = MockBus::default();
        // x = 0xF830 = -2000 raw
        bus.load(ADDR, REG_ACCEL_XOUT, &[0xF8, 0x30, 0x00, 0x00, 0x00, 0x00]);
        bus.regs.insert((ADDR, REG_ACCEL_CONFIG), 0x18);
        let mut imu = Mpu6050::new(bus, ADDR);
        let [x, _, _] = imu.accel_g().unwrap();
        assert!((x - (-2000.0 / 2048.0)).abs() < 1e-12);
    }
}
