//! Driver abstraction
//!
//! Traits and types describing what the vendor driver provides.

mod traits;
mod types;

pub use traits::{Spectrometer, SpectrometerDriver};
pub use types::{DeviceDescriptor, DeviceMetadata, IntegrationTimeLimits};
