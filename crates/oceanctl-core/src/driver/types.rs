//! Device descriptors and metadata reported by drivers

use core::fmt;

use crate::error::{Error, Result};

/// Identifier of one attached spectrometer, as returned by enumeration
///
/// The session never looks inside a descriptor except to show it to the
/// user or to a resolver; only the driver that produced it knows how to
/// open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Model name (e.g. "USB2000PLUS")
    pub model: String,
    /// Serial number
    pub serial_number: String,
    /// Driver-private locator (bus path, slot number, ...)
    pub locator: String,
}

impl DeviceDescriptor {
    /// Create a new descriptor
    pub fn new(
        model: impl Into<String>,
        serial_number: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            serial_number: serial_number.into(),
            locator: locator.into(),
        }
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.model, self.serial_number)
    }
}

/// Inclusive integration time bounds in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationTimeLimits {
    /// Shortest supported integration time
    pub min_us: u32,
    /// Longest supported integration time
    pub max_us: u32,
}

impl IntegrationTimeLimits {
    /// Create a new limit pair
    pub const fn new(min_us: u32, max_us: u32) -> Self {
        Self { min_us, max_us }
    }

    /// Whether `us` lies within the bounds
    pub fn contains(&self, us: u32) -> bool {
        (self.min_us..=self.max_us).contains(&us)
    }

    /// Whether the bounds describe a non-empty range
    pub fn is_valid(&self) -> bool {
        self.min_us <= self.max_us
    }

    /// Clamp `us` into the bounds
    ///
    /// Never panics; on an inverted pair the maximum wins.
    pub fn clamp(&self, us: u32) -> u32 {
        us.max(self.min_us).min(self.max_us)
    }

    /// Check `us` against the bounds, naming the violated bound on failure
    pub fn check(&self, us: u32) -> Result<()> {
        if us < self.min_us {
            Err(Error::Configuration(format!(
                "integration time {} us is below the minimum of {} us",
                us, self.min_us
            )))
        } else if us > self.max_us {
            Err(Error::Configuration(format!(
                "integration time {} us exceeds the maximum of {} us",
                us, self.max_us
            )))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for IntegrationTimeLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} us", self.min_us, self.max_us)
    }
}

/// Static metadata of an open spectrometer
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceMetadata {
    /// Model name
    pub model: String,
    /// Serial number
    pub serial_number: String,
    /// Saturation level of the detector in counts
    pub max_intensity: f64,
    /// Supported integration time range
    pub integration_time_limits: IntegrationTimeLimits,
}
