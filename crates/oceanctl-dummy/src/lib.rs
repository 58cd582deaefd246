//! oceanctl-dummy - In-memory spectrometer emulator for testing
//!
//! This crate provides a dummy driver that enumerates a configurable set of
//! emulated spectrometers. Each one produces a synthetic emission spectrum
//! (dark baseline plus a few Gaussian lines) that scales with integration
//! time and saturates at the detector maximum. It's useful for testing and
//! development without real hardware.

use std::cell::Cell;
use std::rc::Rc;

use oceanctl_core::driver::{
    DeviceDescriptor, DeviceMetadata, IntegrationTimeLimits, Spectrometer, SpectrometerDriver,
};
use oceanctl_core::error::{Error, Result};
use oceanctl_core::spectrum::Spectrum;

/// Emission lines of the synthetic lamp: (center nm, relative height)
const LINES: &[(f64, f64)] = &[(435.8, 0.45), (546.1, 1.0), (696.5, 0.3), (763.5, 0.6)];

/// Line width (standard deviation) in nm
const LINE_SIGMA_NM: f64 = 1.5;

/// Integration time at which the strongest line reaches `line_counts`
const REFERENCE_INTEGRATION_US: f64 = 10_000.0;

/// Configuration for one emulated spectrometer
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Model name reported by enumeration and metadata
    pub model: String,
    /// Serial number
    pub serial_number: String,
    /// Number of detector pixels
    pub pixels: usize,
    /// Wavelength of the first pixel in nm
    pub wavelength_start: f64,
    /// Wavelength of the last pixel in nm
    pub wavelength_end: f64,
    /// Detector saturation level in counts
    pub max_intensity: f64,
    /// Supported integration time range
    pub limits: IntegrationTimeLimits,
    /// Dark baseline in counts
    pub dark_counts: f64,
    /// Height of the strongest line at the reference integration time
    pub line_counts: f64,
    /// Peak-to-peak amplitude of the pseudo-random noise (0 disables it)
    pub noise: f64,
    /// Make `open` fail
    pub fail_open: bool,
    /// Make reads fail once this many reads have succeeded
    pub fail_read_after: Option<usize>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            model: "USB2000PLUS".into(),
            serial_number: "USB2+F00000".into(),
            pixels: 2048,
            wavelength_start: 339.0,
            wavelength_end: 1025.0,
            max_intensity: 65535.0,
            limits: IntegrationTimeLimits::new(1000, 655_350_000),
            dark_counts: 1500.0,
            line_counts: 20_000.0,
            noise: 0.0,
            fail_open: false,
            fail_read_after: None,
        }
    }
}

impl DummyConfig {
    /// Default configuration with a serial number derived from `index`
    pub fn numbered(index: usize) -> Self {
        Self {
            serial_number: format!("USB2+F{:05}", index),
            ..Self::default()
        }
    }

    /// Wavelength axis of this configuration
    pub fn wavelengths(&self) -> Vec<f64> {
        match self.pixels {
            0 => Vec::new(),
            1 => vec![self.wavelength_start],
            n => {
                let step = (self.wavelength_end - self.wavelength_start) / (n - 1) as f64;
                (0..n)
                    .map(|i| self.wavelength_start + step * i as f64)
                    .collect()
            }
        }
    }

    fn metadata(&self) -> DeviceMetadata {
        DeviceMetadata {
            model: self.model.clone(),
            serial_number: self.serial_number.clone(),
            max_intensity: self.max_intensity,
            integration_time_limits: self.limits,
        }
    }
}

/// Dummy spectrometer driver
///
/// Enumerates one emulated device per configuration. A device can only be
/// open once at a time; a second `open` fails until the first handle is
/// closed or dropped.
pub struct DummyDriver {
    devices: Vec<(DummyConfig, Rc<Cell<bool>>)>,
}

impl DummyDriver {
    /// Create a driver emulating the given devices
    pub fn new(configs: Vec<DummyConfig>) -> Self {
        let devices = configs
            .into_iter()
            .map(|c| (c, Rc::new(Cell::new(false))))
            .collect();
        Self { devices }
    }

    /// Create a driver with `count` default devices
    pub fn with_devices(count: usize) -> Self {
        Self::new((0..count).map(DummyConfig::numbered).collect())
    }

    /// Create a driver with a single default device
    pub fn new_default() -> Self {
        Self::with_devices(1)
    }

    fn locator(index: usize) -> String {
        format!("dummy:{}", index)
    }
}

impl SpectrometerDriver for DummyDriver {
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>> {
        Ok(self
            .devices
            .iter()
            .enumerate()
            .map(|(i, (c, _))| DeviceDescriptor::new(&c.model, &c.serial_number, Self::locator(i)))
            .collect())
    }

    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn Spectrometer>> {
        let (config, in_use) = self
            .devices
            .iter()
            .enumerate()
            .find(|(i, _)| Self::locator(*i) == device.locator)
            .map(|(_, d)| d)
            .ok_or_else(|| Error::Connection(format!("no emulated device {}", device)))?;

        if config.fail_open {
            return Err(Error::Connection(format!(
                "{} did not respond to open",
                device
            )));
        }
        if in_use.get() {
            return Err(Error::Connection(format!("{} is already open", device)));
        }

        in_use.set(true);
        log::debug!("Opened emulated spectrometer {}", device);

        Ok(Box::new(DummySpectrometer::new(
            config.clone(),
            Rc::clone(in_use),
        )))
    }
}

/// One open emulated spectrometer
pub struct DummySpectrometer {
    config: DummyConfig,
    wavelengths: Vec<f64>,
    integration_us: u32,
    reads: usize,
    rng: u64,
    in_use: Rc<Cell<bool>>,
    open: bool,
}

impl DummySpectrometer {
    fn new(config: DummyConfig, in_use: Rc<Cell<bool>>) -> Self {
        let wavelengths = config.wavelengths();
        let seed = config
            .serial_number
            .bytes()
            .fold(0x9E37_79B9_7F4A_7C15u64, |h, b| {
                (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01B3)
            });
        let integration_us = config.limits.clamp(REFERENCE_INTEGRATION_US as u32);
        Self {
            config,
            wavelengths,
            integration_us,
            reads: 0,
            rng: seed | 1,
            in_use,
            open: true,
        }
    }

    fn next_noise(&mut self) -> f64 {
        // xorshift64
        self.rng ^= self.rng << 13;
        self.rng ^= self.rng >> 7;
        self.rng ^= self.rng << 17;
        let unit = (self.rng >> 11) as f64 / (1u64 << 53) as f64;
        (unit - 0.5) * self.config.noise
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::Acquisition("device handle is closed".into()))
        }
    }
}

impl Spectrometer for DummySpectrometer {
    fn metadata(&self) -> Result<DeviceMetadata> {
        Ok(self.config.metadata())
    }

    fn set_integration_time_us(&mut self, us: u32) -> Result<()> {
        self.ensure_open()?;
        self.config.limits.check(us)?;
        self.integration_us = us;
        Ok(())
    }

    fn read_spectrum(&mut self) -> Result<Spectrum> {
        self.ensure_open()?;
        if let Some(limit) = self.config.fail_read_after {
            if self.reads >= limit {
                return Err(Error::Acquisition(format!(
                    "emulated transfer fault after {} reads",
                    limit
                )));
            }
        }

        let scale = f64::from(self.integration_us) / REFERENCE_INTEGRATION_US;
        let max = self.config.max_intensity;
        let mut intensities = Vec::with_capacity(self.wavelengths.len());
        for i in 0..self.wavelengths.len() {
            let w = self.wavelengths[i];
            let signal: f64 = LINES
                .iter()
                .map(|&(center, height)| {
                    let d = (w - center) / LINE_SIGMA_NM;
                    height * (-0.5 * d * d).exp()
                })
                .sum();
            let noise = if self.config.noise > 0.0 {
                self.next_noise()
            } else {
                0.0
            };
            let counts = self.config.dark_counts + signal * self.config.line_counts * scale + noise;
            intensities.push(counts.clamp(0.0, max));
        }

        self.reads += 1;
        Spectrum::new(self.wavelengths.clone(), intensities)
    }

    fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.in_use.set(false);
            log::debug!("Closed emulated spectrometer {}", self.config.serial_number);
        }
        Ok(())
    }
}

impl Drop for DummySpectrometer {
    fn drop(&mut self) {
        if self.open {
            self.in_use.set(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_first(driver: &mut DummyDriver) -> Box<dyn Spectrometer> {
        let devices = driver.list_devices().unwrap();
        driver.open(&devices[0]).unwrap()
    }

    #[test]
    fn test_enumeration() {
        let mut driver = DummyDriver::with_devices(3);
        let devices = driver.list_devices().unwrap();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].serial_number, "USB2+F00000");
        assert_eq!(devices[2].serial_number, "USB2+F00002");
        assert_ne!(devices[0].locator, devices[1].locator);

        let mut empty = DummyDriver::with_devices(0);
        assert!(empty.list_devices().unwrap().is_empty());
    }

    #[test]
    fn test_read_spectrum_shape() {
        let mut driver = DummyDriver::new_default();
        let mut dev = open_first(&mut driver);
        let s = dev.read_spectrum().unwrap();
        assert_eq!(s.len(), 2048);
        assert_eq!(s.wavelengths()[0], 339.0);
        assert!((s.wavelengths()[2047] - 1025.0).abs() < 1e-9);

        // Strongest line is the 546 nm one
        let (peak_w, _) = s.peak().unwrap();
        assert!((peak_w - 546.1).abs() < 1.0);
    }

    #[test]
    fn test_integration_time_scales_and_saturates() {
        let mut driver = DummyDriver::new_default();
        let mut dev = open_first(&mut driver);

        dev.set_integration_time_us(10_000).unwrap();
        let (_, short) = dev.read_spectrum().unwrap().peak().unwrap();
        dev.set_integration_time_us(20_000).unwrap();
        let (_, long) = dev.read_spectrum().unwrap().peak().unwrap();
        assert!(long > short);

        dev.set_integration_time_us(10_000_000).unwrap();
        let (_, saturated) = dev.read_spectrum().unwrap().peak().unwrap();
        assert_eq!(saturated, 65535.0);
    }

    #[test]
    fn test_integration_time_limits() {
        let mut driver = DummyDriver::new_default();
        let mut dev = open_first(&mut driver);
        let err = dev.set_integration_time_us(10).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        let err = dev.set_integration_time_us(700_000_000).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_noise_is_deterministic_per_serial() {
        let config = DummyConfig {
            noise: 50.0,
            ..DummyConfig::default()
        };
        let mut a = DummyDriver::new(vec![config.clone()]);
        let mut b = DummyDriver::new(vec![config]);
        let sa = open_first(&mut a).read_spectrum().unwrap();
        let sb = open_first(&mut b).read_spectrum().unwrap();
        assert_eq!(sa, sb);

        let clean = open_first(&mut DummyDriver::new_default())
            .read_spectrum()
            .unwrap();
        assert_ne!(sa, clean);
    }

    #[test]
    fn test_fail_open() {
        let mut driver = DummyDriver::new(vec![DummyConfig {
            fail_open: true,
            ..DummyConfig::default()
        }]);
        let devices = driver.list_devices().unwrap();
        assert!(matches!(driver.open(&devices[0]), Err(Error::Connection(_))));
    }

    #[test]
    fn test_fail_read_after() {
        let mut driver = DummyDriver::new(vec![DummyConfig {
            fail_read_after: Some(2),
            ..DummyConfig::default()
        }]);
        let mut dev = open_first(&mut driver);
        assert!(dev.read_spectrum().is_ok());
        assert!(dev.read_spectrum().is_ok());
        assert!(matches!(dev.read_spectrum(), Err(Error::Acquisition(_))));
    }

    #[test]
    fn test_exclusive_open() {
        let mut driver = DummyDriver::new_default();
        let devices = driver.list_devices().unwrap();
        let mut first = driver.open(&devices[0]).unwrap();
        assert!(matches!(driver.open(&devices[0]), Err(Error::Connection(_))));

        first.close().unwrap();
        assert!(matches!(first.read_spectrum(), Err(Error::Acquisition(_))));
        let second = driver.open(&devices[0]).unwrap();
        drop(second);
        assert!(driver.open(&devices[0]).is_ok());
    }

    #[test]
    fn test_unknown_descriptor() {
        let mut driver = DummyDriver::new_default();
        let bogus = DeviceDescriptor::new("USB2000PLUS", "X", "dummy:7");
        assert!(matches!(driver.open(&bogus), Err(Error::Connection(_))));
    }
}
