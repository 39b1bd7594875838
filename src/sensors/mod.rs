//! Register-level drivers for the sensors the demos exercise.
//!
//! Drivers are generic over [`RegisterBus`](crate::i2c::RegisterBus), so the
//! conversion arithmetic runs unchanged against real hardware or a mock
//! register file.

pub mod adxl345;
pub mod mpu6050;

pub use adxl345::Adxl345;
pub use mpu6050::Mpu6050;
