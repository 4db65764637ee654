//! Platform agnostic driver for the TI TMP117 digital temperature sensor, built on the
//! [`embedded-hal`](https://docs.rs/embedded-hal) blocking I2C traits.
//!
//! Besides plain register access the crate provides the two pieces with actual logic in
//! them:
//!
//! - [`fixed_point`]: saturating conversion between the s8.7 register format and
//!   decimal fixed point (`2345` for 23.45 °C).
//! - [`eeprom::EepromTracker`]: non-blocking tracking of EEPROM writes, which need a
//!   settle delay before the busy flag can be polled.
//!
//! Nothing in the driver blocks. Call [`Tmp117::process_idle`] from your main loop
//! with a wrapping millisecond counter after power-up, reset or EEPROM writes.

#![cfg_attr(not(test), no_std)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod fmt;

mod device;
pub mod eeprom;
mod error;
pub mod fixed_point;
pub mod registers;
pub mod thermometer;

pub use self::{
    device::{SlaveAddr, Tmp117},
    error::{Error, Result},
    fixed_point::{decimal_to_iq, iq_to_decimal, Temperature},
    thermometer::Thermometer,
};
