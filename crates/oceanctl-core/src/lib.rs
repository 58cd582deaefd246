//! oceanctl-core - Core library for Ocean Optics spectrometer control
//!
//! This crate holds everything that does not depend on a particular
//! driver backend: the error type, the spectrum data model, the driver
//! traits that backends implement, and the averaging accumulator.
//!
//! # Example
//!
//! ```ignore
//! use oceanctl_core::driver::SpectrometerDriver;
//!
//! fn first_spectrum<D: SpectrometerDriver>(driver: &mut D) -> oceanctl_core::Result<()> {
//!     let devices = driver.list_devices()?;
//!     let device = devices.first().ok_or(oceanctl_core::Error::NoDevice)?;
//!     let mut handle = driver.open(device)?;
//!     let spectrum = handle.read_spectrum()?;
//!     println!("{} pixels, peak {:?}", spectrum.len(), spectrum.peak());
//!     handle.close()
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod driver;
pub mod error;
pub mod spectrum;

pub use error::{Error, ErrorKind, Result};
