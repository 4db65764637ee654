//! Register level driver for the TMP117.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::{
    eeprom::{EepromLock, EepromSlot, EepromTracker, EepromUnlock, WriteState},
    error::{Error, Result},
    fixed_point::{decimal_to_iq, iq_to_decimal, Temperature},
    fmt::{debug, info, trace, warn},
    registers::{
        AlertMode, AlertPinPolarity, AlertPinSelect, Averaging, Configuration, ConversionCycle,
        ConversionMode, DeviceId, Register,
    },
    thermometer::Thermometer,
};

/// Bus address, selected by the connection of the ADD0 pin.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveAddr {
    /// ADD0 tied to GND (default).
    #[default]
    Gnd,
    /// ADD0 tied to V+.
    Vplus,
    /// ADD0 tied to SDA.
    Sda,
    /// ADD0 tied to SCL.
    Scl,
}

impl From<SlaveAddr> for u8 {
    fn from(addr: SlaveAddr) -> Self {
        match addr {
            SlaveAddr::Gnd => 0x48,
            SlaveAddr::Vplus => 0x49,
            SlaveAddr::Sda => 0x4A,
            SlaveAddr::Scl => 0x4B,
        }
    }
}

/// TMP117 on an I2C bus.
///
/// Typical usage:
///
/// 1. Create an instance through [`Tmp117::new`] and check the chip with [`Tmp117::init`]
/// 2. Call [`Tmp117::process_idle`] periodically until it returns true; the chip loads its
///    EEPROM after power-up and reset
/// 3. Read temperatures with [`Tmp117::temperature`] or [`Tmp117::temperature_decimal`]
///
/// EEPROM writes return immediately. Keep calling [`Tmp117::process_idle`] with a
/// millisecond counter until it reports idle before issuing the next one.
pub struct Tmp117<I2C> {
    i2c: I2C,
    address: u8,
    eeprom: EepromTracker,
}

impl<I2C> Tmp117<I2C> {
    pub fn new(i2c: I2C, address: SlaveAddr) -> Self {
        Self::new_with_address(i2c, address.into())
    }

    /// Creates a driver for a raw 7-bit address
    pub const fn new_with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            eeprom: EepromTracker::new(),
        }
    }

    /// Returns the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub const fn address(&self) -> u8 {
        self.address
    }

    pub const fn eeprom_state(&self) -> WriteState {
        self.eeprom.state()
    }
}

fn read_word<I2C: WriteRead>(
    i2c: &mut I2C,
    address: u8,
    reg: Register,
) -> core::result::Result<[u8; 2], I2C::Error> {
    let mut buf = [0u8; 2];
    i2c.write_read(address, &[reg.addr()], &mut buf)?;
    Ok(buf)
}

impl<I2C, E> Tmp117<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    fn read_u16(&mut self, reg: Register) -> Result<u16, E> {
        Ok(u16::from_be_bytes(read_word(&mut self.i2c, self.address, reg)?))
    }

    fn read_i16(&mut self, reg: Register) -> Result<i16, E> {
        Ok(i16::from_be_bytes(read_word(&mut self.i2c, self.address, reg)?))
    }

    fn write_word(&mut self, reg: Register, [hi, lo]: [u8; 2]) -> Result<(), E> {
        self.i2c.write(self.address, &[reg.addr(), hi, lo])?;
        Ok(())
    }

    /// Reads the configuration register.
    ///
    /// Reading it clears the data ready flag, and in alert mode the alert flags.
    pub fn configuration(&mut self) -> Result<Configuration, E> {
        self.read_u16(Register::Configuration).map(Configuration)
    }

    fn update_configuration(
        &mut self,
        f: impl FnOnce(Configuration) -> Configuration,
    ) -> Result<(), E> {
        let config = f(self.configuration()?);
        self.write_word(Register::Configuration, config.0.to_be_bytes())
    }

    /// Checks that a TMP117 answers at the configured address.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedDeviceId`] if another device answers, [`Error::I2c`] if none does.
    pub fn init(&mut self) -> Result<DeviceId, E> {
        let id = DeviceId(self.read_u16(Register::DeviceId)?);
        if id.id() != DeviceId::TMP117 {
            warn!("Unexpected device ID {=u16:#x} at {=u8:#x}", id.id(), self.address);
            return Err(Error::UnexpectedDeviceId(id.id()));
        }

        info!("Found TMP117 rev {=u8} at {=u8:#x}", id.revision(), self.address);
        Ok(id)
    }

    /// Non-blocking processing of EEPROM writes and resets, returns true if idle.
    ///
    /// `now` is a free running millisecond counter, it may wrap. The configuration
    /// register is read at most once per call and only while waiting for the busy
    /// flag to clear.
    pub fn process_idle(&mut self, now: u16) -> Result<bool, E> {
        let Self {
            i2c,
            address,
            eeprom,
        } = self;

        let idle = eeprom.try_tick(now, || {
            read_word(i2c, *address, Register::Configuration).map(u16::from_be_bytes)
        })?;
        Ok(idle)
    }

    /// [`Tmp117::process_idle`] for use with `nb::block!`.
    pub fn wait_eeprom(&mut self, now: u16) -> nb::Result<(), Error<E>> {
        if self.process_idle(now)? {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Reads the last conversion result.
    ///
    /// Reads -256 °C after reset until the first conversion has finished.
    pub fn temperature(&mut self) -> Result<Temperature, E> {
        self.temperature_raw().map(Temperature::from_bits)
    }

    /// Reads the last conversion result in s8.7 format
    pub fn temperature_raw(&mut self) -> Result<i16, E> {
        self.read_i16(Register::Temperature)
    }

    /// Reads the last conversion result in °C scaled by `10^decimals`
    pub fn temperature_decimal(&mut self, decimals: u8) -> Result<i16, E> {
        Ok(iq_to_decimal(self.temperature_raw()?, decimals))
    }

    pub fn set_high_limit_raw(&mut self, limit: i16) -> Result<(), E> {
        self.write_word(Register::HighLimit, limit.to_be_bytes())
    }

    /// Sets the high limit from °C scaled by `10^decimals`. Out of range values
    /// saturate, see [`decimal_to_iq`].
    pub fn set_high_limit_decimal(&mut self, limit: i16, decimals: u8) -> Result<(), E> {
        self.set_high_limit_raw(decimal_to_iq(limit, decimals))
    }

    pub fn high_limit_raw(&mut self) -> Result<i16, E> {
        self.read_i16(Register::HighLimit)
    }

    pub fn high_limit_decimal(&mut self, decimals: u8) -> Result<i16, E> {
        Ok(iq_to_decimal(self.high_limit_raw()?, decimals))
    }

    pub fn set_low_limit_raw(&mut self, limit: i16) -> Result<(), E> {
        self.write_word(Register::LowLimit, limit.to_be_bytes())
    }

    /// Sets the low limit from °C scaled by `10^decimals`. Out of range values
    /// saturate, see [`decimal_to_iq`].
    pub fn set_low_limit_decimal(&mut self, limit: i16, decimals: u8) -> Result<(), E> {
        self.set_low_limit_raw(decimal_to_iq(limit, decimals))
    }

    pub fn low_limit_raw(&mut self) -> Result<i16, E> {
        self.read_i16(Register::LowLimit)
    }

    pub fn low_limit_decimal(&mut self, decimals: u8) -> Result<i16, E> {
        Ok(iq_to_decimal(self.low_limit_raw()?, decimals))
    }

    /// 12-bit device ID, 0x117 for a TMP117
    pub fn device_id(&mut self) -> Result<u16, E> {
        Ok(DeviceId(self.read_u16(Register::DeviceId)?).id())
    }

    pub fn device_revision(&mut self) -> Result<u8, E> {
        Ok(DeviceId(self.read_u16(Register::DeviceId)?).revision())
    }

    /// Triggers a soft reset.
    ///
    /// The chip reloads its registers from EEPROM, [`Tmp117::process_idle`] reports
    /// idle once that is done.
    pub fn reset(&mut self) -> Result<(), E> {
        debug!("Soft reset");
        self.update_configuration(Configuration::with_soft_reset)?;
        self.eeprom.restart();
        Ok(())
    }

    pub fn set_alert_pin_source(&mut self, source: AlertPinSelect) -> Result<(), E> {
        self.update_configuration(|c| c.with_alert_pin_select(source))
    }

    pub fn alert_pin_source(&mut self) -> Result<AlertPinSelect, E> {
        Ok(self.configuration()?.alert_pin_select())
    }

    pub fn set_alert_pin_polarity(&mut self, polarity: AlertPinPolarity) -> Result<(), E> {
        self.update_configuration(|c| c.with_alert_pin_polarity(polarity))
    }

    pub fn alert_pin_polarity(&mut self) -> Result<AlertPinPolarity, E> {
        Ok(self.configuration()?.alert_pin_polarity())
    }

    pub fn set_alert_mode(&mut self, mode: AlertMode) -> Result<(), E> {
        self.update_configuration(|c| c.with_alert_mode(mode))
    }

    pub fn alert_mode(&mut self) -> Result<AlertMode, E> {
        Ok(self.configuration()?.alert_mode())
    }

    pub fn set_averaging(&mut self, averaging: Averaging) -> Result<(), E> {
        self.update_configuration(|c| c.with_averaging(averaging))
    }

    pub fn averaging(&mut self) -> Result<Averaging, E> {
        Ok(self.configuration()?.averaging())
    }

    pub fn set_conversion_cycle(&mut self, cycle: ConversionCycle) -> Result<(), E> {
        self.update_configuration(|c| c.with_conversion_cycle(cycle))
    }

    pub fn conversion_cycle(&mut self) -> Result<ConversionCycle, E> {
        Ok(self.configuration()?.conversion_cycle())
    }

    pub fn set_conversion_mode(&mut self, mode: ConversionMode) -> Result<(), E> {
        self.update_configuration(|c| c.with_conversion_mode(mode))
    }

    pub fn conversion_mode(&mut self) -> Result<ConversionMode, E> {
        Ok(self.configuration()?.conversion_mode())
    }

    pub fn is_data_ready(&mut self) -> Result<bool, E> {
        Ok(self.configuration()?.data_ready())
    }

    pub fn is_high_alert(&mut self) -> Result<bool, E> {
        Ok(self.configuration()?.high_alert())
    }

    pub fn is_low_alert(&mut self) -> Result<bool, E> {
        Ok(self.configuration()?.low_alert())
    }

    /// Returns what the ALERT pin signals: data ready if the pin is configured for it,
    /// otherwise either alert flag.
    pub fn is_alert(&mut self) -> Result<bool, E> {
        Ok(self.configuration()?.alert())
    }

    pub fn is_eeprom_busy(&mut self) -> Result<bool, E> {
        Ok(EepromUnlock(self.read_u16(Register::EepromUnlock)?).is_busy())
    }

    pub fn is_eeprom_unlocked(&mut self) -> Result<bool, E> {
        Ok(EepromUnlock(self.read_u16(Register::EepromUnlock)?).is_unlocked())
    }

    /// Locks or unlocks the EEPROM. While unlocked, writes to EEPROM backed registers
    /// (limits, configuration, slots) also program the EEPROM.
    pub fn set_eeprom_lock(&mut self, lock: EepromLock) -> Result<(), E> {
        let reg = EepromUnlock(self.read_u16(Register::EepromUnlock)?).with_lock(lock);
        self.write_word(Register::EepromUnlock, reg.0.to_be_bytes())
    }

    /// Writes an EEPROM slot at millisecond time `now`.
    ///
    /// The EEPROM needs to be unlocked with [`Tmp117::set_eeprom_lock`] for the value to
    /// be programmed. A write still in progress is not waited for.
    pub fn write_eeprom(&mut self, slot: EepromSlot, value: u16, now: u16) -> Result<(), E> {
        self.write_eeprom_word(slot, value.to_be_bytes(), now)
    }

    /// Writes the temperature offset in s8.7 format, see [`Tmp117::write_eeprom`].
    pub fn write_temperature_offset(&mut self, offset: i16, now: u16) -> Result<(), E> {
        self.write_eeprom_word(EepromSlot::TemperatureOffset, offset.to_be_bytes(), now)
    }

    fn write_eeprom_word(&mut self, slot: EepromSlot, word: [u8; 2], now: u16) -> Result<(), E> {
        if !self.eeprom.is_idle() {
            debug!("EEPROM write while {}, restarting tracking", self.eeprom.state());
        }
        trace!("EEPROM write {} = {=u16:#x}", slot, u16::from_be_bytes(word));

        self.write_word(slot.register(), word)?;
        self.eeprom.on_write_issued(now);
        Ok(())
    }

    pub fn read_eeprom(&mut self, slot: EepromSlot) -> Result<u16, E> {
        self.read_u16(slot.register())
    }

    /// Reads the temperature offset in s8.7 format
    pub fn read_temperature_offset(&mut self) -> Result<i16, E> {
        self.read_i16(EepromSlot::TemperatureOffset.register())
    }
}

impl<I2C, E> Thermometer for Tmp117<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = Error<E>;

    fn read(&mut self) -> Result<Temperature, E> {
        self.temperature()
    }
}
