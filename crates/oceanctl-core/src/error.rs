//! Error types for oceanctl-core
//!
//! Every fallible operation in the workspace returns this error type, so a
//! caller can tell "no spectrometer attached" apart from "the driver failed"
//! without string matching.

use thiserror::Error;

/// Core error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Discovery errors
    /// Enumeration returned no devices
    #[error("no spectrometer found, please check connection")]
    NoDevice,
    /// Several devices were found and nothing was supplied to pick one
    #[error("{count} spectrometers found and no device selection was given")]
    AmbiguousDevice {
        /// Number of devices returned by enumeration
        count: usize,
    },

    // Session errors
    /// The driver could not open the selected device
    #[error("failed to connect to device: {0}")]
    Connection(String),
    /// Operation requires an open session
    #[error("spectrometer not connected")]
    NotConnected,
    /// `connect` was called on a session that already holds a device
    #[error("spectrometer already connected")]
    AlreadyConnected,

    // Device errors
    /// Invalid device configuration (e.g. integration time out of bounds)
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The driver failed to deliver a spectrum
    #[error("acquisition failed: {0}")]
    Acquisition(String),

    // Caller errors
    /// Argument rejected before any driver call was made
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A reading's wavelength axis differs from the first reading of an average
    #[error("sample {sample} has an inconsistent wavelength axis: {reason}")]
    InconsistentAxis {
        /// Zero-based index of the offending reading
        sample: usize,
        /// What differed
        reason: String,
    },
}

/// Fieldless discriminant of [`Error`], for matching on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::NoDevice`]
    NoDevice,
    /// See [`Error::AmbiguousDevice`]
    AmbiguousDevice,
    /// See [`Error::Connection`]
    Connection,
    /// See [`Error::NotConnected`]
    NotConnected,
    /// See [`Error::AlreadyConnected`]
    AlreadyConnected,
    /// See [`Error::Configuration`]
    Configuration,
    /// See [`Error::Acquisition`]
    Acquisition,
    /// See [`Error::InvalidArgument`]
    InvalidArgument,
    /// See [`Error::InconsistentAxis`]
    InconsistentAxis,
}

impl Error {
    /// Get the class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoDevice => ErrorKind::NoDevice,
            Self::AmbiguousDevice { .. } => ErrorKind::AmbiguousDevice,
            Self::Connection(_) => ErrorKind::Connection,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::AlreadyConnected => ErrorKind::AlreadyConnected,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Acquisition(_) => ErrorKind::Acquisition,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InconsistentAxis { .. } => ErrorKind::InconsistentAxis,
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::NoDevice.kind(), ErrorKind::NoDevice);
        assert_eq!(
            Error::AmbiguousDevice { count: 3 }.kind(),
            ErrorKind::AmbiguousDevice
        );
        assert_eq!(
            Error::InconsistentAxis {
                sample: 1,
                reason: "length".into()
            }
            .kind(),
            ErrorKind::InconsistentAxis
        );
    }

    #[test]
    fn test_display_includes_details() {
        let e = Error::AmbiguousDevice { count: 2 };
        assert!(e.to_string().contains('2'));

        let e = Error::Configuration("integration time 5 us below minimum 1000 us".into());
        assert!(e.to_string().contains("below minimum"));
    }
}
