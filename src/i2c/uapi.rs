use nix::ioctl_write_ptr_bad;

// linux/i2c.h message flags; only the read direction is needed here
pub const I2C_M_RD: u16 = 0x0001;

// linux/i2c-dev.h
pub(crate) const I2C_RDWR: u32 = 0x0707;

pub(crate) const I2C_RDWR_IOCTL_MAX_MSGS: usize = 42;

/// struct i2c_msg
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub(crate) struct i2c_msg {
    pub(crate) addr: u16,
    pub(crate) flags: u16,
    pub(crate) len: u16,
    pub(crate) buf: *mut u8,
}

/// struct i2c_rdwr_ioctl_data
#[derive(Debug)]
#[repr(C)]
pub(crate) struct i2c_rdwr_ioctl_data {
    pub(crate) msgs: *mut i2c_msg,
    pub(crate) nmsgs: u32,
}

ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, i2c_rdwr_ioctl_data);
