//! Logging macros that forward to `defmt` when the `defmt` feature is enabled.
//!
//! Without the feature every macro expands to nothing, but its arguments are still
//! type-checked so disabled log statements don't rot.

#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = $crate::fmt::ignore!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = $crate::fmt::ignore!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = $crate::fmt::ignore!($($arg)*);
    }};
}

macro_rules! warn_ {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = $crate::fmt::ignore!($($arg)*);
    }};
}

/// Borrows every argument after the format string.
macro_rules! ignore_ {
    ($fmt:literal $(,)?) => { () };
    ($fmt:literal, $($arg:expr),+ $(,)?) => { ($(&$arg,)+) };
}

#[allow(unused_imports)]
pub(crate) use {debug, ignore_ as ignore, info, trace, warn_ as warn};
