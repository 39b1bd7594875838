// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::mem::MaybeUninit;

use bitflags::bitflags;
use nix::{ioctl_read, ioctl_readwrite};

pub const GPIO_LINES_MAX: usize = 64;
pub const GPIO_MAX_NAME_SIZE: usize = 32;
pub const GPIO_LINE_NUM_ATTRS_MAX: usize = 10;

bitflags! {
    /// Line request and informational flags
    ///
    /// Maps to kernel [`GPIO_V2_LINE_FLAG_*`] flags.
    ///
    /// [`GPIO_V2_LINE_FLAG_*`]: https://github.com/torvalds/linux/blob/v5.19/include/uapi/linux/gpio.h
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct LineFlags: u64 {
        const USED = (1 << 0);
        const ACTIVE_LOW = (1 << 1);
        const INPUT = (1 << 2);
        const OUTPUT = (1 << 3);
        const EDGE_RISING = (1 << 4);
        const EDGE_FALLING = (1 << 5);
        const OPEN_DRAIN = (1 << 6);
        const OPEN_SOURCE = (1 << 7);
        const BIAS_PULL_UP = (1 << 8);
        const BIAS_PULL_DOWN = (1 << 9);
        const BIAS_DISABLED = (1 << 10);
        const EVENT_CLOCK_REALTIME = (1 << 11);
        const EVENT_CLOCK_HTE = (1 << 12);
    }
}

bitflags! {
    /// Attribute IDs
    ///
    /// Maps to kernel [`GPIO_V2_LINE_ATTR_ID_*`] flags.
    ///
    /// [`GPIO_V2_LINE_ATTR_ID_*`]: https://github.com/torvalds/linux/blob/v5.19/include/uapi/linux/gpio.h
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineAttrId: u32 {
        const FLAGS = 1;
        const OUTPUT_VALUES = 2;
        const DEBOUNCE = 3;
    }
}

bitflags! {
    /// Line Event ID
    ///
    /// Maps to kernel [`GPIO_V2_LINE_EVENT_*`] flags.
    ///
    /// [`GPIO_V2_LINE_EVENT_*`]: https://github.com/torvalds/linux/blob/v5.19/include/uapi/linux/gpio.h
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineEventId: u32 {
        const RISING_EDGE = 1;
        const FALLING_EDGE = 2;
    }
}

// struct gpiochip_info
#[repr(C)]
pub(crate) struct gpio_chip_info {
    pub(crate) name: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) label: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) lines: u32,
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_values {
    pub(crate) bits: u64,
    pub(crate) mask: u64,
}

/// a configurable attribute of a line
#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_attribute {
    /// attribute identifier
    pub(crate) id: LineAttrId,
    /// reserved for future use and must be zero filled
    pub(crate) _padding: u32,
    /// A tagged union when combined with `id`
    pub(crate) attribute: gpio_line_attribute_union,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) union gpio_line_attribute_union {
    /// if `id` is [`LineAttrId::FLAGS`], flags overriding the request
    /// defaults for the associated lines
    pub(crate) flags: LineFlags,
    /// if `id` is [`LineAttrId::OUTPUT_VALUES`], a bitmap of the values the
    /// lines will be set to, bit numbers indexing the request offsets
    pub(crate) values: u64,
    /// if `id` is [`LineAttrId::DEBOUNCE`], the debounce period in
    /// microseconds
    pub(crate) debounce_period: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_config_attribute {
    pub(crate) attr: gpio_line_attribute,
    pub(crate) mask: u64,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_config {
    pub(crate) flags: LineFlags,
    pub(crate) num_attrs: u32,
    _padding: [u32; 5],
    pub(crate) attrs: [MaybeUninit<gpio_line_config_attribute>; GPIO_LINE_NUM_ATTRS_MAX],
}

impl gpio_line_config {
    pub const fn zeroed() -> Self {
        Self {
            flags: LineFlags::empty(),
            num_attrs: 0,
            _padding: [0; 5],
            attrs: [MaybeUninit::zeroed(); GPIO_LINE_NUM_ATTRS_MAX],
        }
    }
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_request {
    pub(crate) offsets: [u32; GPIO_LINES_MAX],
    pub(crate) consumer: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) config: gpio_line_config,
    pub(crate) num_lines: u32,
    pub(crate) event_buffer_size: u32,
    _padding: [u32; 5],
    pub(crate) fd: std::os::fd::RawFd,
}

impl gpio_line_request {
    pub const fn zeroed() -> Self {
        Self {
            offsets: [0; GPIO_LINES_MAX],
            consumer: [0; GPIO_MAX_NAME_SIZE],
            config: gpio_line_config::zeroed(),
            num_lines: 0,
            event_buffer_size: 0,
            _padding: [0; 5],
            fd: 0,
        }
    }
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_event {
    pub(crate) timestamp_ns: u64,
    pub(crate) id: LineEventId,
    pub(crate) offset: u32,
    pub(crate) seqno: u32,
    pub(crate) line_seqno: u32,
    /* Space reserved for future use. */
    _padding: [MaybeUninit<u32>; 6],
}

impl gpio_line_event {
    #[inline(always)]
    pub const fn zeroed() -> Self {
        Self {
            timestamp_ns: 0,
            id: LineEventId::empty(),
            offset: 0,
            seqno: 0,
            line_seqno: 0,
            _padding: [MaybeUninit::zeroed(); 6],
        }
    }

    /// # Safety:
    ///
    /// Caller must ensure that the bytes are a kernel-produced event record
    pub const unsafe fn from_bytes(bytes: [u8; std::mem::size_of::<Self>()]) -> Self {
        let buf_ptr = (&bytes as *const _) as *const Self;
        unsafe { std::ptr::read_unaligned(buf_ptr) }
    }
}

impl Default for gpio_line_event {
    #[inline(always)]
    fn default() -> Self {
        Self::zeroed()
    }
}

ioctl_read!(gpio_get_chipinfo, 0xB4, 0x01, gpio_chip_info);

ioctl_readwrite!(gpio_get_line, 0xB4, 0x07, gpio_line_request);

ioctl_readwrite!(gpio_line_get_values, 0xB4, 0x0E, gpio_line_values);
ioctl_readwrite!(gpio_line_set_values, 0xB4, 0x0F, gpio_line_values);
