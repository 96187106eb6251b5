//! Internal logging shims.
//!
//! Forwards to `defmt` on embedded targets, to `tracing` on hosts, and compiles to
//! nothing when neither feature is enabled. Only positional `{}` arguments are used
//! so the same format strings are valid for both backends.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        tracing::trace!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($($arg)*,);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        tracing::debug!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($($arg)*,);
    }};
}

pub(crate) use debug;
pub(crate) use trace;
