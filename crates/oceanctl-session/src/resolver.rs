//! Device selection when enumeration finds more than one spectrometer

use oceanctl_core::driver::DeviceDescriptor;
use oceanctl_core::error::{Error, Result};

/// Picks one device out of an enumeration result
///
/// Only consulted when more than one device is attached. The returned
/// index refers to the slice passed in.
pub trait DeviceResolver {
    /// Choose a device
    fn resolve(&mut self, devices: &[DeviceDescriptor]) -> Result<usize>;
}

impl<F> DeviceResolver for F
where
    F: FnMut(&[DeviceDescriptor]) -> Result<usize>,
{
    fn resolve(&mut self, devices: &[DeviceDescriptor]) -> Result<usize> {
        self(devices)
    }
}

/// Refuses to choose, so several attached devices are an error
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAmbiguous;

impl DeviceResolver for RejectAmbiguous {
    fn resolve(&mut self, devices: &[DeviceDescriptor]) -> Result<usize> {
        Err(Error::AmbiguousDevice {
            count: devices.len(),
        })
    }
}

/// Always picks the device at a fixed (0-based) position
#[derive(Debug, Clone, Copy)]
pub struct SelectIndex(pub usize);

impl DeviceResolver for SelectIndex {
    fn resolve(&mut self, _devices: &[DeviceDescriptor]) -> Result<usize> {
        Ok(self.0)
    }
}

/// Picks the device with a given serial number
#[derive(Debug, Clone)]
pub struct SelectSerial(pub String);

impl DeviceResolver for SelectSerial {
    fn resolve(&mut self, devices: &[DeviceDescriptor]) -> Result<usize> {
        devices
            .iter()
            .position(|d| d.serial_number == self.0)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("no spectrometer with serial number {}", self.0))
            })
    }
}
