//! ADXL345 3-axis digital accelerometer (±2 g/±4 g/±8 g/±16 g), driven over
//! I2C.

use crate::errors::Result;
use crate::i2c::RegisterBus;

const REG_DEVID: u8 = 0x00;
const REG_BW_RATE: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;
const REG_DATA_FORMAT: u8 = 0x31;
const REG_DATAX0: u8 = 0x32;

/// Fixed device id in the DEVID register.
pub const DEVICE_ID: u8 = 0xE5;

/// POWER_CTL measure bit.
const MEASURE: u8 = 0x08;
/// DATA_FORMAT full-resolution bit.
const FULL_RES: u8 = 0x08;

/// Measurement range, the low two bits of DATA_FORMAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Range {
    G2 = 0x00,
    G4 = 0x01,
    G8 = 0x02,
    G16 = 0x03,
}

/// 100 Hz output data rate, the power-on default the demo selects.
pub const DATA_RATE_100_HZ: u8 = 0x0A;

pub struct Adxl345<B> {
    bus: B,
    address: u16,
}

impl<B: RegisterBus> Adxl345<B> {
    pub fn new(bus: B, address: u16) -> Self {
        Self { bus, address }
    }

    /// True when the DEVID register holds the fixed ADXL345 id.
    pub fn probe(&mut self) -> Result<bool> {
        Ok(self.bus.read_register(self.address, REG_DEVID)? == DEVICE_ID)
    }

    /// Leave standby and start measuring.
    pub fn power_on(&mut self) -> Result<()> {
        self.bus.write_register(self.address, REG_POWER_CTL, MEASURE)
    }

    /// The currently configured range bits.
    pub fn range(&mut self) -> Result<u8> {
        Ok(self.bus.read_register(self.address, REG_DATA_FORMAT)? & 0x03)
    }

    /// Set the measurement range, preserving the unrelated DATA_FORMAT bits
    /// and forcing full resolution so the scale factor stays constant
    /// across ranges.
    pub fn set_range(&mut self, range: Range) -> Result<()> {
        let mut reg = self.bus.read_register(self.address, REG_DATA_FORMAT)? & !0x0F;
        reg |= range as u8;
        reg |= FULL_RES;
        self.bus.write_register(self.address, REG_DATA_FORMAT, reg)
    }

    /// The currently configured output data rate bits.
    pub fn data_rate(&mut self) -> Result<u8> {
        Ok(self.bus.read_register(self.address, REG_BW_RATE)? & 0x0F)
    }

    /// Set the output data rate. The low-power bit is left clear, keeping
    /// the device in normal operation.
    pub fn set_data_rate(&mut self, rate: u8) -> Result<()> {
        self.bus
            .write_register(self.address, REG_BW_RATE, rate & 0x0F)
    }

    /// One (x, y, z) sample: a 6-byte block read from DATAX0, each axis a
    /// little-endian signed 16-bit pair.
    pub fn read(&mut self) -> Result<(i16, i16, i16)> {
        let raw = self.bus.read_block(self.address, REG_DATAX0, 6)?;
        let axis = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]);
        Ok((
            axis(raw[0], raw[1]),
            axis(raw[2], raw[3]),
            axis(raw[4], raw[5]),
        ))
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

    const ADDR: u16 = 0x53;

    #[test]
    fn probe_checks_the_device_id() {
        let bus = MockBus::with_registers(ADDR, [(REG_DEVID, DEVICE_ID)]);
        let mut accel = Adxl345::new(bus, ADDR);
        assert!(accel.probe().unwrap());

        let bus = MockBus::with_registers(ADDR, [(REG_DEVID, 0x00)]);
        let mut accel = Adxl345::new(bus, ADDR);
        assert!(!accel.probe().unwrap());
    }

    #[test]
    fn set_range_preserves_unrelated_bits_and_forces_full_res() {
        // self-test, spi, int_invert and justify bits set
        let bus = MockBus::with_registers(ADDR, [(REG_DATA_FORMAT, 0xE4)]);
        let mut accel = Adxl345::new(bus, ADDR);
        accel.set_range(Range::G2).unwrap();
        let reg = accel.bus.regs[&(ADDR, REG_DATA_FORMAT)];
        assert_eq!(reg, 0xE0 | FULL_RES | Range::G2 as u8);
        assert_eq!(accel.range().unwrap(), 0x00);

        accel.set_range(Range::G16).unwrap();
        let reg = accel.bus.regs[&(ADDR, REG_DATA_FORMAT)];
        assert_eq!(reg, 0xE0 | FULL_RES | Range::G16 as u8);
        assert_eq!(accel.range().unwrap(), 0x03);
    }

    #[test]
    fn data_rate_is_masked_to_the_rate_bits() {
        let bus = MockBus::default();
        let mut accel = Adxl345::new(bus, ADDR);
        accel.set_data_rate(0xFA).unwrap();
        assert_eq!(accel.data_rate().unwrap(), 0x0A);
    }

    #[test]
    fn read_decodes_six_little_endian_bytes() {
        let mut bus = MockBus::default();
        bus.load(ADDR, REG_DATAX0, &[0x00, 0x08, 0x00, 0x10, 0x00, 0x18]);
        let mut accel = Adxl345::new(bus, ADDR);
        assert_eq!(accel.read().unwrap(), (2048, 4096, 6144));
    }

    #[test]
    fn read_handles_negative_samples() {
        let mut bus = MockBus::default();
        bus.load(ADDR, REG_DATAX0, &[0xFF, 0xFF, 0x00, 0x80, 0x01, 0x00]);
        let mut accel = Adxl345::new(bus, ADDR);
        assert_eq!(accel.read().unwrap(), (-1, -32768, 1));
    }
}
