//! Temperature sensor interface

use crate::fixed_point::Temperature;

pub trait Thermometer {
    type Error;

    /// Read the temperature in degrees Celsius
    ///
    /// The result has the sensor's native s8.7 format, a precision of 0.0078125 °C.
    fn read(&mut self) -> Result<Temperature, Self::Error>;
}
