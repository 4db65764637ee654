pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus Error
    I2c(E),

    /// The device answered with an ID other than the TMP117's. Usually a different
    /// chip sits at the configured address.
    UnexpectedDeviceId(u16),
}

impl<E> Error<E> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::I2c(_) => "I2C error",
            Error::UnexpectedDeviceId(_) => "Unexpected device ID",
        }
    }
}

impl<E> From<E> for Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}
