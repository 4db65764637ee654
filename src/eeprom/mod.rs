//! On-chip EEPROM: general purpose slots, lock state and write tracking.

mod tracker;

pub use self::tracker::{EepromTracker, WriteState, EEPROM_WRITE_DELAY_MS};
use crate::registers::Register;

/// EEPROM backed register that can be programmed by the user.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromSlot {
    /// General purpose word. Holds the NIST traceability ID from the factory, don't
    /// overwrite it if traceability matters.
    Eeprom1,
    Eeprom2,
    /// Temperature offset applied after linearization, s8.7 format.
    TemperatureOffset,
    Eeprom3,
}

impl EepromSlot {
    pub const fn register(self) -> Register {
        match self {
            Self::Eeprom1 => Register::Eeprom1,
            Self::Eeprom2 => Register::Eeprom2,
            Self::TemperatureOffset => Register::TemperatureOffset,
            Self::Eeprom3 => Register::Eeprom3,
        }
    }
}

/// Whether register writes also program the EEPROM.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromLock {
    /// Writes only change the volatile registers.
    Locked,
    /// Writes to EEPROM backed registers also program the EEPROM.
    Unlocked,
}

/// EEPROM unlock register (0x04).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromUnlock(pub u16);

impl EepromUnlock {
    /// `EUN`: 1 = unlocked.
    pub const UNLOCK: u16 = 1 << 15;
    /// Mirror of the configuration register busy flag.
    pub const BUSY: u16 = 1 << 14;

    #[must_use]
    pub const fn is_unlocked(self) -> bool {
        self.0 & Self::UNLOCK != 0
    }

    #[must_use]
    pub const fn is_busy(self) -> bool {
        self.0 & Self::BUSY != 0
    }

    #[must_use]
    pub const fn lock(self) -> EepromLock {
        if self.is_unlocked() {
            EepromLock::Unlocked
        } else {
            EepromLock::Locked
        }
    }

    #[must_use]
    pub const fn with_lock(self, lock: EepromLock) -> Self {
        match lock {
            EepromLock::Locked => Self(self.0 & !Self::UNLOCK),
            EepromLock::Unlocked => Self(self.0 | Self::UNLOCK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_registers() {
        assert_eq!(EepromSlot::Eeprom1.register() as u8, 0x05);
        assert_eq!(EepromSlot::Eeprom2.register() as u8, 0x06);
        assert_eq!(EepromSlot::TemperatureOffset.register() as u8, 0x07);
        assert_eq!(EepromSlot::Eeprom3.register() as u8, 0x08);
    }

    #[test]
    fn unlock_bits() {
        let reg = EepromUnlock(0x4000);
        assert!(reg.is_busy());
        assert!(!reg.is_unlocked());
        assert_eq!(reg.lock(), EepromLock::Locked);

        let reg = reg.with_lock(EepromLock::Unlocked);
        assert_eq!(reg, EepromUnlock(0xC000));
        assert_eq!(reg.lock(), EepromLock::Unlocked);
        assert_eq!(reg.with_lock(EepromLock::Locked), EepromUnlock(0x4000));
    }
}
