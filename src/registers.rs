//! Register map and bit fields of the TMP117.
//!
//! Registers are 16 bits wide and transferred MSB first. Bit fields are accessed
//! through masks on the raw word, see the TMP117 datasheet section 7.6.

/// Register addresses
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Temperature = 0x00,
    Configuration = 0x01,
    HighLimit = 0x02,
    LowLimit = 0x03,
    EepromUnlock = 0x04,
    Eeprom1 = 0x05,
    Eeprom2 = 0x06,
    TemperatureOffset = 0x07,
    Eeprom3 = 0x08,
    DeviceId = 0x0F,
}

impl Register {
    #[inline]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Function of the ALERT pin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPinSelect {
    /// Pin reflects the alert flags
    Alert,
    /// Pin reflects the data ready flag
    DataReady,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPinPolarity {
    ActiveLow,
    ActiveHigh,
}

/// Behaviour of the high/low alert flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertMode {
    /// Flags latch when a limit is crossed and clear on read.
    Alert,
    /// Comparator with hysteresis, the low limit is the release threshold.
    Therm,
}

/// Number of conversions averaged per result.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    Off,
    Avg8,
    Avg32,
    Avg64,
}

impl Averaging {
    fn from_config_register(bits: u16) -> Self {
        match bits & 0b11 {
            0b00 => Self::Off,
            0b01 => Self::Avg8,
            0b10 => Self::Avg32,
            _ => Self::Avg64,
        }
    }

    pub const fn to_config_register(self) -> u16 {
        self as u16
    }
}

/// Conversion cycle code.
///
/// The actual cycle time is never shorter than the averaging time, the names give
/// the cycle with averaging off.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionCycle {
    Ms15_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms4000,
    Ms8000,
    Ms16000,
}

impl ConversionCycle {
    fn from_config_register(bits: u16) -> Self {
        match bits & 0b111 {
            0 => Self::Ms15_5,
            1 => Self::Ms125,
            2 => Self::Ms250,
            3 => Self::Ms500,
            4 => Self::Ms1000,
            5 => Self::Ms4000,
            6 => Self::Ms8000,
            _ => Self::Ms16000,
        }
    }

    pub const fn to_config_register(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    Continuous,
    Shutdown,
    OneShot,
}

impl ConversionMode {
    fn from_config_register(bits: u16) -> Self {
        match bits & 0b11 {
            // 0b10 is continuous as well, it reads back as 0b00
            0b00 | 0b10 => Self::Continuous,
            0b01 => Self::Shutdown,
            _ => Self::OneShot,
        }
    }

    pub const fn to_config_register(self) -> u16 {
        match self {
            Self::Continuous => 0b00,
            Self::Shutdown => 0b01,
            Self::OneShot => 0b11,
        }
    }
}

/// Configuration register (0x01).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration(pub u16);

impl Configuration {
    pub const SOFT_RESET: u16 = 1 << 1;
    pub const ALERT_PIN_SELECT: u16 = 1 << 2;
    pub const POLARITY: u16 = 1 << 3;
    pub const ALERT_MODE: u16 = 1 << 4;
    const AVG_SHIFT: u16 = 5;
    const AVG_MASK: u16 = 0b11 << Self::AVG_SHIFT;
    const CONV_SHIFT: u16 = 7;
    const CONV_MASK: u16 = 0b111 << Self::CONV_SHIFT;
    const MOD_SHIFT: u16 = 10;
    const MOD_MASK: u16 = 0b11 << Self::MOD_SHIFT;
    pub const EEPROM_BUSY: u16 = 1 << 12;
    pub const DATA_READY: u16 = 1 << 13;
    pub const LOW_ALERT: u16 = 1 << 14;
    pub const HIGH_ALERT: u16 = 1 << 15;

    const fn flag(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    const fn with_flag(self, mask: u16, set: bool) -> Self {
        if set {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    const fn with_field(self, mask: u16, shift: u16, value: u16) -> Self {
        Self((self.0 & !mask) | ((value << shift) & mask))
    }

    pub const fn soft_reset(self) -> bool {
        self.flag(Self::SOFT_RESET)
    }

    #[must_use]
    pub const fn with_soft_reset(self) -> Self {
        self.with_flag(Self::SOFT_RESET, true)
    }

    pub const fn alert_pin_select(self) -> AlertPinSelect {
        if self.flag(Self::ALERT_PIN_SELECT) {
            AlertPinSelect::DataReady
        } else {
            AlertPinSelect::Alert
        }
    }

    #[must_use]
    pub const fn with_alert_pin_select(self, select: AlertPinSelect) -> Self {
        self.with_flag(
            Self::ALERT_PIN_SELECT,
            matches!(select, AlertPinSelect::DataReady),
        )
    }

    pub const fn alert_pin_polarity(self) -> AlertPinPolarity {
        if self.flag(Self::POLARITY) {
            AlertPinPolarity::ActiveHigh
        } else {
            AlertPinPolarity::ActiveLow
        }
    }

    #[must_use]
    pub const fn with_alert_pin_polarity(self, polarity: AlertPinPolarity) -> Self {
        self.with_flag(
            Self::POLARITY,
            matches!(polarity, AlertPinPolarity::ActiveHigh),
        )
    }

    pub const fn alert_mode(self) -> AlertMode {
        if self.flag(Self::ALERT_MODE) {
            AlertMode::Therm
        } else {
            AlertMode::Alert
        }
    }

    #[must_use]
    pub const fn with_alert_mode(self, mode: AlertMode) -> Self {
        self.with_flag(Self::ALERT_MODE, matches!(mode, AlertMode::Therm))
    }

    pub fn averaging(self) -> Averaging {
        Averaging::from_config_register((self.0 & Self::AVG_MASK) >> Self::AVG_SHIFT)
    }

    #[must_use]
    pub const fn with_averaging(self, averaging: Averaging) -> Self {
        self.with_field(
            Self::AVG_MASK,
            Self::AVG_SHIFT,
            averaging.to_config_register(),
        )
    }

    pub fn conversion_cycle(self) -> ConversionCycle {
        ConversionCycle::from_config_register((self.0 & Self::CONV_MASK) >> Self::CONV_SHIFT)
    }

    #[must_use]
    pub const fn with_conversion_cycle(self, cycle: ConversionCycle) -> Self {
        self.with_field(
            Self::CONV_MASK,
            Self::CONV_SHIFT,
            cycle.to_config_register(),
        )
    }

    pub fn conversion_mode(self) -> ConversionMode {
        ConversionMode::from_config_register((self.0 & Self::MOD_MASK) >> Self::MOD_SHIFT)
    }

    #[must_use]
    pub const fn with_conversion_mode(self, mode: ConversionMode) -> Self {
        self.with_field(Self::MOD_MASK, Self::MOD_SHIFT, mode.to_config_register())
    }

    /// EEPROM programming or power-up load in progress
    pub const fn eeprom_busy(self) -> bool {
        self.flag(Self::EEPROM_BUSY)
    }

    /// A new result is available. Cleared by reading either the temperature or the
    /// configuration register.
    pub const fn data_ready(self) -> bool {
        self.flag(Self::DATA_READY)
    }

    pub const fn low_alert(self) -> bool {
        self.flag(Self::LOW_ALERT)
    }

    pub const fn high_alert(self) -> bool {
        self.flag(Self::HIGH_ALERT)
    }

    /// State the ALERT pin would signal for the selected pin function.
    pub const fn alert(self) -> bool {
        match self.alert_pin_select() {
            AlertPinSelect::DataReady => self.data_ready(),
            AlertPinSelect::Alert => self.high_alert() || self.low_alert(),
        }
    }
}

/// Device ID register (0x0F).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(pub u16);

impl DeviceId {
    /// ID reported by every TMP117
    pub const TMP117: u16 = 0x117;

    pub const fn id(self) -> u16 {
        self.0 & 0x0FFF
    }

    pub const fn revision(self) -> u8 {
        (self.0 >> 12) as u8
    }
}
