//! Session - one spectrometer, from connect to disconnect
//!
//! A [`Session`] owns a driver and at most one open device handle. It is
//! either Disconnected (the initial state) or Connected. Every operation
//! other than `connect` fails with [`Error::NotConnected`] while
//! Disconnected, without touching the driver.

use std::fmt;
use std::thread;
use std::time::Instant;

use oceanctl_core::driver::{
    DeviceDescriptor, DeviceMetadata, IntegrationTimeLimits, Spectrometer, SpectrometerDriver,
};
use oceanctl_core::error::{Error, Result};
use oceanctl_core::spectrum::{AveragedSpectrum, Spectrum, SpectrumAccumulator};

use crate::options::SessionOptions;
use crate::resolver::{DeviceResolver, RejectAmbiguous};

/// Connection state of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No device handle is held
    Disconnected,
    /// A device is open
    Connected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Read-only view of the device configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    /// Model name
    pub model: String,
    /// Serial number
    pub serial_number: String,
    /// Detector saturation level in counts
    pub max_intensity: f64,
    /// Supported integration time range
    pub integration_time_limits: IntegrationTimeLimits,
    /// Integration time currently configured by the session
    pub integration_time_us: u32,
}

impl fmt::Display for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "serial no. {}, max intensity {}, integration time limits {}, integration time {} us",
            self.serial_number, self.max_intensity, self.integration_time_limits, self.integration_time_us
        )
    }
}

/// State that only exists while connected
struct Connection {
    device: DeviceDescriptor,
    handle: Box<dyn Spectrometer>,
    metadata: DeviceMetadata,
    integration_time_us: u32,
    position: (usize, usize),
}

/// A spectrometer session
///
/// ```ignore
/// use oceanctl_session::{open_driver, Session, SessionOptions};
///
/// let driver = open_driver("dummy")?;
/// let mut session = Session::new(driver, SessionOptions::default());
/// session.connect()?;
/// session.set_integration_time(10_000)?;
/// let single = session.take_spectrum()?;
/// let averaged = session.take_average(10)?;
/// session.disconnect()?;
/// ```
pub struct Session {
    driver: Box<dyn SpectrometerDriver>,
    resolver: Option<Box<dyn DeviceResolver>>,
    options: SessionOptions,
    connection: Option<Connection>,
}

impl Session {
    /// Create a disconnected session
    pub fn new<D>(driver: D, options: SessionOptions) -> Self
    where
        D: SpectrometerDriver + 'static,
    {
        Self {
            driver: Box::new(driver),
            resolver: None,
            options,
            connection: None,
        }
    }

    /// Use `resolver` whenever `connect` finds more than one device
    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: DeviceResolver + 'static,
    {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Current connection state
    pub fn state(&self) -> SessionState {
        if self.connection.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Whether a device is open
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Descriptor of the open device
    pub fn device(&self) -> Option<&DeviceDescriptor> {
        self.connection.as_ref().map(|c| &c.device)
    }

    /// Zero-based index of the open device and the number of devices
    /// listed at connect
    pub fn device_position(&self) -> Option<(usize, usize)> {
        self.connection.as_ref().map(|c| c.position)
    }

    /// Model name of the open device
    pub fn device_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.metadata.model.as_str())
    }

    /// Integration time currently configured, if connected
    pub fn integration_time_us(&self) -> Option<u32> {
        self.connection.as_ref().map(|c| c.integration_time_us)
    }

    /// Session options
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Enumerate devices and open one
    ///
    /// With several devices attached, the resolver given to
    /// [`with_resolver`](Self::with_resolver) picks one; without a resolver
    /// this fails with [`Error::AmbiguousDevice`].
    pub fn connect(&mut self) -> Result<()> {
        match self.resolver.take() {
            Some(mut resolver) => {
                let result = self.connect_with(resolver.as_mut());
                self.resolver = Some(resolver);
                result
            }
            None => self.connect_with(&mut RejectAmbiguous),
        }
    }

    /// Like [`connect`](Self::connect), with an explicit resolver
    pub fn connect_with(&mut self, resolver: &mut dyn DeviceResolver) -> Result<()> {
        if self.connection.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let mut devices = self.driver.list_devices()?;
        let attached = devices.len();
        let (index, device) = match attached {
            0 => {
                log::warn!("No spectrometer found, please check connection");
                return Err(Error::NoDevice);
            }
            1 => (0, devices.swap_remove(0)),
            count => {
                log::info!("Multiple spectrometers found:");
                for (i, d) in devices.iter().enumerate() {
                    log::info!("  {}. {}", i + 1, d);
                }
                let index = resolver.resolve(&devices)?;
                if index >= count {
                    return Err(Error::InvalidArgument(format!(
                        "device index {} out of range (1-{})",
                        index + 1,
                        count
                    )));
                }
                (index, devices.swap_remove(index))
            }
        };

        self.note(format_args!("Attempting connection to {}", device));
        let handle = self.driver.open(&device).map_err(|e| match e {
            Error::Connection(_) => e,
            other => Error::Connection(other.to_string()),
        })?;
        thread::sleep(self.options.connect_settle);

        let connection = self.initialize(device, handle, (index, attached))?;
        log::info!("Connection to device {} successful!", connection.metadata.model);
        self.connection = Some(connection);
        Ok(())
    }

    /// Read metadata and apply the initial integration time
    ///
    /// The handle is closed again if either step fails.
    fn initialize(
        &self,
        device: DeviceDescriptor,
        mut handle: Box<dyn Spectrometer>,
        position: (usize, usize),
    ) -> Result<Connection> {
        let setup = |handle: &mut Box<dyn Spectrometer>| -> Result<(DeviceMetadata, u32)> {
            let metadata = handle
                .metadata()
                .map_err(|e| Error::Connection(format!("failed to read metadata: {}", e)))?;

            let requested = self.options.integration_time_us;
            let limits = metadata.integration_time_limits;
            if !limits.is_valid() {
                return Err(Error::Connection(format!(
                    "invalid integration time limits {} reported by {}",
                    limits, device
                )));
            }
            let applied = limits.clamp(requested);
            if applied != requested {
                log::warn!(
                    "Initial integration time {} us outside {}, using {} us",
                    requested,
                    limits,
                    applied
                );
            }
            handle.set_integration_time_us(applied)?;
            thread::sleep(self.options.config_settle);
            Ok((metadata, applied))
        };

        match setup(&mut handle) {
            Ok((metadata, integration_time_us)) => Ok(Connection {
                device,
                handle,
                metadata,
                integration_time_us,
                position,
            }),
            Err(e) => {
                if let Err(close_err) = handle.close() {
                    log::warn!("Failed to close {} after setup error: {}", device, close_err);
                }
                Err(e)
            }
        }
    }

    /// Close the open device
    ///
    /// Returns `Ok(false)` without error when nothing was connected. The
    /// session is Disconnected afterwards even if the driver reports an
    /// error while closing.
    pub fn disconnect(&mut self) -> Result<bool> {
        match self.connection.take() {
            Some(mut connection) => {
                connection.handle.close()?;
                log::info!("Spectrometer {} disconnected", connection.device);
                Ok(true)
            }
            None => {
                log::info!("No spectrometer connected, nothing to disconnect");
                Ok(false)
            }
        }
    }

    /// Device metadata merged with the current integration time
    pub fn get_config(&self) -> Result<ConfigSnapshot> {
        let connection = self.connection.as_ref().ok_or(Error::NotConnected)?;
        let metadata = &connection.metadata;
        let snapshot = ConfigSnapshot {
            model: metadata.model.clone(),
            serial_number: metadata.serial_number.clone(),
            max_intensity: metadata.max_intensity,
            integration_time_limits: metadata.integration_time_limits,
            integration_time_us: connection.integration_time_us,
        };
        self.note(format_args!("{}", snapshot));
        Ok(snapshot)
    }

    /// Set the integration time in microseconds
    ///
    /// Zero and values outside the device limits fail with
    /// [`Error::Configuration`] before reaching the driver. On any failure
    /// the previously configured value stays in effect.
    pub fn set_integration_time(&mut self, us: u32) -> Result<()> {
        let settle = self.options.config_settle;
        let connection = self.connection_mut()?;
        if us == 0 {
            return Err(Error::Configuration(
                "integration time must be a positive number of microseconds".into(),
            ));
        }
        connection.metadata.integration_time_limits.check(us)?;
        connection.handle.set_integration_time_us(us)?;
        thread::sleep(settle);
        connection.integration_time_us = us;

        self.note(format_args!("Integration time set to {} us", us));
        Ok(())
    }

    /// Acquire one spectrum
    pub fn take_spectrum(&mut self) -> Result<Spectrum> {
        self.read(true)
    }

    /// Acquire `n_samples` spectra and average them
    ///
    /// `n_samples` below 1 fails with [`Error::InvalidArgument`] without
    /// any driver call. A failed read or a reading on a different
    /// wavelength axis aborts the whole average.
    pub fn take_average(&mut self, n_samples: i64) -> Result<AveragedSpectrum> {
        self.take_average_with_progress(n_samples, |_, _| {})
    }

    /// Like [`take_average`](Self::take_average), calling
    /// `progress(done, total)` after each reading
    pub fn take_average_with_progress<F>(
        &mut self,
        n_samples: i64,
        mut progress: F,
    ) -> Result<AveragedSpectrum>
    where
        F: FnMut(usize, usize),
    {
        self.connection_mut()?;
        let total = usize::try_from(n_samples)
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "number of samples must be at least 1, got {}",
                    n_samples
                ))
            })?;

        let start = Instant::now();
        let mut accumulator = SpectrumAccumulator::new();
        for done in 1..=total {
            let reading = self.read(false)?;
            accumulator.push(reading)?;
            progress(done, total);
        }
        let spectrum = accumulator.finish()?;
        let elapsed = start.elapsed();

        self.note(format_args!(
            "Averaged spectrum of {} samples acquired in {:.2} s",
            total,
            elapsed.as_secs_f64()
        ));

        Ok(AveragedSpectrum {
            spectrum,
            samples: total,
            elapsed,
        })
    }

    fn read(&mut self, report: bool) -> Result<Spectrum> {
        let spectrum = self.connection_mut()?.handle.read_spectrum()?;
        if report {
            self.note(format_args!("Spectrum acquired ({} pixels)", spectrum.len()));
        }
        Ok(spectrum)
    }

    fn connection_mut(&mut self) -> Result<&mut Connection> {
        self.connection.as_mut().ok_or(Error::NotConnected)
    }

    fn note(&self, args: fmt::Arguments<'_>) {
        if self.options.verbose {
            log::info!("{}", args);
        } else {
            log::debug!("{}", args);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            if let Err(e) = connection.handle.close() {
                log::warn!("Failed to close {}: {}", connection.device, e);
            }
        }
    }
}
