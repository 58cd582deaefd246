//! Driver trait definitions
//!
//! The vendor driver is the only component that talks to hardware. It is
//! split in two traits:
//! - [`SpectrometerDriver`] enumerates attached devices and opens them
//! - [`Spectrometer`] is one open device handle
//!
//! Both are object safe so the session can hold `Box<dyn ...>` and the
//! registry can pick a backend at runtime.

use super::types::{DeviceDescriptor, DeviceMetadata};
use crate::error::Result;
use crate::spectrum::Spectrum;

/// Device discovery and opening
pub trait SpectrometerDriver {
    /// List attached devices in enumeration order (possibly empty)
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>>;

    /// Open a device previously returned by [`list_devices`](Self::list_devices)
    ///
    /// Fails with [`Error::Connection`](crate::Error::Connection) if the
    /// device cannot be opened.
    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn Spectrometer>>;
}

/// An open spectrometer handle
///
/// The handle is an exclusive resource. Calls are blocking and must not
/// overlap; `&mut self` enforces that within one process.
pub trait Spectrometer {
    /// Static metadata (serial number, max intensity, integration limits)
    fn metadata(&self) -> Result<DeviceMetadata>;

    /// Program the integration time
    ///
    /// Fails with [`Error::Configuration`](crate::Error::Configuration)
    /// if `us` is outside the hardware limits.
    fn set_integration_time_us(&mut self, us: u32) -> Result<()>;

    /// Acquire one spectrum
    ///
    /// Fails with [`Error::Acquisition`](crate::Error::Acquisition) on a
    /// communication fault.
    fn read_spectrum(&mut self) -> Result<Spectrum>;

    /// Release the device
    fn close(&mut self) -> Result<()>;
}

impl<T: SpectrometerDriver + ?Sized> SpectrometerDriver for Box<T> {
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>> {
        (**self).list_devices()
    }

    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn Spectrometer>> {
        (**self).open(device)
    }
}
