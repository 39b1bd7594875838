// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `periphio` crate provides direct access to the Linux userspace I/O
//! ABIs from Rust: I2C (`/dev/i2c-N`), SPI (`/dev/spidevX.Y`), serial ports
//! (termios), GPIO via the character device (`/dev/gpiochipN`, v2 line
//! uapi), and PWM via `/sys/class/pwm`.
//!
//! Every subsystem is an independent leaf: a handle type that owns one file
//! descriptor, opened and released by the caller, with synchronous blocking
//! operations executing strictly in call order. There is no shared state
//! across handles and no retry logic anywhere; a failed operation surfaces
//! one [`errors::Error`] carrying the native diagnostic and leaves recovery
//! to the caller.
//!
//! # Examples
//!
//! Read a register off an I2C peripheral:
//!
//! ```no_run
//! use periphio::i2c::{I2c, RegisterBus};
//!
//! # fn main() -> periphio::errors::Result<()> {
//! let mut bus = I2c::open("/dev/i2c-0")?;
//! // DEVID register of an ADXL345 at address 0x53
//! let id = bus.read_register(0x53, 0x00)?;
//! println!("device id: 0x{id:02x}");
//! # Ok(()) }
//! ```
//!
//! Wait for a button press on a GPIO line:
//!
//! ```no_run
//! use std::time::Duration;
//! use periphio::gpio::{Chip, EdgeDetect};
//!
//! # fn main() -> periphio::errors::Result<()> {
//! let chip = Chip::open("/dev/gpiochip0")?;
//! let mut events = chip.line(3).request_events("button", EdgeDetect::Falling)?;
//! match events.wait(Some(Duration::from_secs(5)))? {
//!     Some(event) => println!("{:?} at {} ns", event.kind(), event.timestamp_ns()),
//!     None => println!("timed out"),
//! }
//! # Ok(()) }
//! ```

pub mod errors;

pub mod fixed_str;

mod poll;

pub mod gpio;

pub mod i2c;

pub mod pwm;

pub mod serial;

pub mod spi;

pub mod sensors;

pub use errors::{Error, Result};
pub use gpio::{chips, Chip};
