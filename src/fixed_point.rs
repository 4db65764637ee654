//! Conversion between the sensor's s8.7 register format and decimal fixed point.
//!
//! Temperature, limit and offset registers all hold a signed 16-bit value with 7
//! fractional bits (1/128 °C per LSB). Applications usually prefer an integer scaled
//! by a power of ten, e.g. `2345` for 23.45 °C with two decimals. The routines here
//! rescale between the two without a wider intermediate type by interleaving the
//! binary shifts with multiplications or divisions by 5, shifting first while there
//! is headroom so as few low bits as possible are lost.

use fixed::types::I9F7;

/// s8.7 fixed point temperature in degrees Celsius.
///
/// 7 fractional bits give a precision of 0.0078125 °C & a range of (-256, 256 - 0.0078125).
pub type Temperature = I9F7;

static_assertions::assert_eq_size!(Temperature, i16);

/// Number of fractional bits in the register format.
pub const FRACTIONAL_BITS: u8 = 7;

/// Largest supported number of decimal digits.
pub const MAX_DECIMALS: u8 = 2;

/// Inclusive range of decimal inputs that fit the register format, or `None` if
/// `decimals` is unsupported.
#[must_use]
pub const fn decimal_range(decimals: u8) -> Option<(i16, i16)> {
    match decimals {
        0 => Some((-256, 255)),
        1 => Some((-2560, 2559)),
        2 => Some((-25600, 25599)),
        _ => None,
    }
}

/// Converts `value / 10^decimals` °C to the s8.7 register format.
///
/// `decimal_to_iq(95, 1)` (9.5 °C) yields `0x04C0`.
///
/// Inputs outside [`decimal_range`] and unsupported `decimals` saturate to
/// `i16::MAX` for positive values and to `i16::MIN` otherwise. Note that these are
/// the integer extremes, not the ±256 °C bounds of the sensor.
#[must_use]
#[cfg_attr(feature = "sizing", inline(never))]
pub fn decimal_to_iq(value: i16, decimals: u8) -> i16 {
    let in_range = match decimal_range(decimals) {
        Some((min, max)) => (min..=max).contains(&value),
        None => false,
    };
    if !in_range {
        return if value > 0 { i16::MAX } else { i16::MIN };
    }

    // value / 10^d * 2^7 == value / 5^d * 2^(7 - d)
    let mut value = value;
    let mut decimals = decimals;
    let mut shifts = FRACTIONAL_BITS - decimals;

    while shifts > 0 || decimals > 0 {
        // Once the divisions are done the remaining shifts can't be deferred any more.
        while shifts > 0 && (decimals == 0 || (i16::MIN >> 1 < value && value < i16::MAX >> 1)) {
            shifts -= 1;
            value = value.saturating_mul(2);
        }
        if decimals > 0 {
            decimals -= 1;
            value /= 5;
        }
    }

    value
}

/// Converts an s8.7 register value to °C scaled by `10^decimals`.
///
/// `iq_to_decimal(0x04C0, 1)` yields `95`.
///
/// `i16::MIN` and `i16::MAX` are treated as already saturated and returned as is.
/// Unsupported `decimals` always yield `i16::MAX`.
#[must_use]
#[cfg_attr(feature = "sizing", inline(never))]
pub fn iq_to_decimal(value: i16, decimals: u8) -> i16 {
    if decimals > MAX_DECIMALS {
        return i16::MAX;
    }
    if value == i16::MIN || value == i16::MAX {
        return value;
    }

    // value * 10^d / 2^7 == value * 5^d / 2^(7 - d)
    let mut value = value;
    let mut decimals = decimals;
    let mut shifts = FRACTIONAL_BITS - decimals;

    while shifts > 0 || decimals > 0 {
        while decimals > 0 && (shifts == 0 || (i16::MIN / 5 < value && value < i16::MAX / 5)) {
            decimals -= 1;
            value = value.saturating_mul(5);
        }
        if shifts > 0 {
            shifts -= 1;
            // Arithmetic shift, keeps the sign
            value >>= 1;
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_decimal_literal() {
        assert_eq!(decimal_to_iq(95, 1), 0x04C0);
        assert_eq!(iq_to_decimal(0x04C0, 1), 95);
    }

    #[test]
    fn register_defaults() {
        // High limit resets to 0x6000 (192 °C)
        assert_eq!(iq_to_decimal(0x6000, 0), 192);
        assert_eq!(iq_to_decimal(0x6000, 2), 19200);
        // 25 °C
        assert_eq!(iq_to_decimal(0x0C80, 2), 2500);
        assert_eq!(decimal_to_iq(2500, 2), 0x0C80);
    }

    #[test]
    fn negative_values_shift_arithmetically() {
        assert_eq!(iq_to_decimal(-128, 0), -1);
        assert_eq!(iq_to_decimal(-1, 0), -1);
        assert_eq!(iq_to_decimal(-1, 2), -1);
        assert_eq!(decimal_to_iq(-1050, 1), -13440);
        assert_eq!(iq_to_decimal(-13440, 1), -1050);
    }

    #[test]
    fn saturates_out_of_range() {
        assert_eq!(decimal_to_iq(256, 0), i16::MAX);
        assert_eq!(decimal_to_iq(-257, 0), i16::MIN);
        assert_eq!(decimal_to_iq(2560, 1), i16::MAX);
        assert_eq!(decimal_to_iq(-2561, 1), i16::MIN);
        assert_eq!(decimal_to_iq(25600, 2), i16::MAX);
        assert_eq!(decimal_to_iq(-25601, 2), i16::MIN);
    }

    #[test]
    fn saturation_uses_integer_extremes() {
        // Overflow saturates to the i16 extremes, not to the converted range limit
        // (255 °C would be 0x7F80).
        assert_eq!(decimal_to_iq(1000, 0), 0x7FFF);
        assert_eq!(decimal_to_iq(-1000, 0), -0x8000);
    }

    #[test]
    fn unsupported_decimals_saturate() {
        assert_eq!(decimal_to_iq(5, 3), i16::MAX);
        assert_eq!(decimal_to_iq(-5, 3), i16::MIN);
        assert_eq!(decimal_to_iq(0, 3), i16::MIN);
        assert_eq!(decimal_to_iq(0, u8::MAX), i16::MIN);
        assert_eq!(iq_to_decimal(0x04C0, 3), i16::MAX);
        assert_eq!(iq_to_decimal(-0x04C0, 7), i16::MAX);
    }

    #[test]
    fn extremes_pass_through() {
        assert_eq!(iq_to_decimal(i16::MIN, 1), i16::MIN);
        assert_eq!(iq_to_decimal(i16::MAX, 2), i16::MAX);
        assert_eq!(iq_to_decimal(i16::MAX, 0), i16::MAX);
    }

    #[test]
    fn lowest_temperature_terminates() {
        // -256 °C is exactly i16::MIN; the last shift has no headroom left.
        assert_eq!(decimal_to_iq(-256, 0), i16::MIN);
        assert_eq!(decimal_to_iq(-2560, 1), i16::MIN);
        assert_eq!(decimal_to_iq(-25600, 2), i16::MIN);
    }

    #[test]
    fn highest_temperatures() {
        assert_eq!(decimal_to_iq(255, 0), 0x7F80);
        assert_eq!(decimal_to_iq(2559, 1), 32752);
        assert_eq!(decimal_to_iq(25599, 2), 32760);
    }

    fn round_trip_error(value: i16, decimals: u8) -> Option<i32> {
        let iq = decimal_to_iq(value, decimals);
        if iq == i16::MIN || iq == i16::MAX {
            return None;
        }
        Some((i32::from(iq_to_decimal(iq, decimals)) - i32::from(value)).abs())
    }

    #[test]
    fn round_trip_whole_degrees_is_exact() {
        for value in -255..=255 {
            assert_eq!(round_trip_error(value, 0), Some(0), "value {value}");
        }
    }

    #[test]
    fn round_trip_tenths_within_one() {
        for value in -2559..=2559 {
            let err = round_trip_error(value, 1).unwrap();
            assert!(err <= 1, "value {value}: error {err}");
        }
    }

    #[test]
    fn round_trip_hundredths() {
        for value in -1000..=1000 {
            let err = round_trip_error(value, 2).unwrap();
            assert!(err <= 1, "value {value}: error {err}");
        }
        // Large magnitudes lose low bits to the interleaved divisions.
        for value in -25599..=25599 {
            let err = round_trip_error(value, 2).unwrap();
            assert!(err <= 9, "value {value}: error {err}");
        }
    }

    #[test]
    fn matches_fixed_type() {
        let t = Temperature::from_bits(decimal_to_iq(2345, 2));
        assert_eq!(t.to_bits(), 3001);
        assert_eq!(t.to_num::<f32>(), 23.445_312_5);
        assert_eq!(Temperature::from_bits(0x04C0), Temperature::from_num(9.5));
    }
}
