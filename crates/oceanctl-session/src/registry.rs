//! Driver registry
//!
//! Opens driver backends from a string such as `dummy` or
//! `dummy:devices=2,noise=40`, so callers never name a backend type.

use std::collections::HashMap;
use std::str::FromStr;

use oceanctl_core::driver::SpectrometerDriver;
use oceanctl_core::error::{Error, Result};

/// Information about a driver backend
pub struct DriverInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all drivers enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_drivers() -> Vec<DriverInfo> {
    let mut drivers = Vec::new();

    #[cfg(feature = "dummy")]
    drivers.push(DriverInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "Emulated USB2000+ spectrometers (devices=<n>,model=<name>,pixels=<n>,noise=<counts>)",
    });

    drivers
}

/// Comma-separated driver names for CLI help
pub fn driver_names_short() -> String {
    let drivers = available_drivers();
    let names: Vec<&str> = drivers.iter().map(|d| d.name).collect();
    names.join(", ")
}

/// Parsed driver specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverParams {
    /// Driver name
    pub name: String,
    /// Key-value options
    pub params: HashMap<String, String>,
}

impl DriverParams {
    /// Parse the option `key` if present
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.params
            .get(key)
            .map(|v| {
                v.parse::<T>().map_err(|e| {
                    Error::InvalidArgument(format!(
                        "invalid value '{}' for {} option {}: {}",
                        v, self.name, key, e
                    ))
                })
            })
            .transpose()
    }

    /// Fail if any option is not in `known`
    pub fn reject_unknown(&self, known: &[&str]) -> Result<()> {
        let mut unknown: Vec<&str> = self
            .params
            .keys()
            .map(String::as_str)
            .filter(|k| !known.contains(k))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort_unstable();
        Err(Error::InvalidArgument(format!(
            "unknown {} option(s): {} (supported: {})",
            self.name,
            unknown.join(", "),
            known.join(", ")
        )))
    }
}

/// Parse a driver string into name and options
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_driver_params(s: &str) -> Result<DriverParams> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));
    if name.is_empty() {
        return Err(Error::InvalidArgument("empty driver name".into()));
    }

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            match opt.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    params.insert(key.to_string(), value.to_string());
                }
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "invalid driver option '{}' (expected key=value)",
                        opt
                    )))
                }
            }
        }
    }

    Ok(DriverParams {
        name: name.to_string(),
        params,
    })
}

/// Open a driver backend by specification string
pub fn open_driver(spec: &str) -> Result<Box<dyn SpectrometerDriver>> {
    let params = parse_driver_params(spec)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" | "emulator" => open_dummy(&params),

        _ => Err(Error::InvalidArgument(format!(
            "unknown driver '{}' (available: {})",
            params.name,
            driver_names_short()
        ))),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &DriverParams) -> Result<Box<dyn SpectrometerDriver>> {
    use oceanctl_dummy::{DummyConfig, DummyDriver};

    params.reject_unknown(&[
        "devices",
        "model",
        "pixels",
        "noise",
        "fail_open",
        "fail_read_after",
    ])?;

    let count: usize = params.get("devices")?.unwrap_or(1);
    let model: Option<String> = params.get("model")?;
    let pixels: Option<usize> = params.get("pixels")?;
    let noise: Option<f64> = params.get("noise")?;
    let fail_open: bool = params.get("fail_open")?.unwrap_or(false);
    let fail_read_after: Option<usize> = params.get("fail_read_after")?;

    if let Some(noise) = noise {
        if !(noise.is_finite() && noise >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "dummy noise must be a non-negative number, got {}",
                noise
            )));
        }
    }

    let configs = (0..count)
        .map(|i| {
            let mut config = DummyConfig::numbered(i);
            if let Some(model) = &model {
                config.model = model.clone();
            }
            if let Some(pixels) = pixels {
                config.pixels = pixels;
            }
            if let Some(noise) = noise {
                config.noise = noise;
            }
            config.fail_open = fail_open;
            config.fail_read_after = fail_read_after;
            config
        })
        .collect();

    log::debug!("Emulating {} spectrometer(s)", count);
    Ok(Box::new(DummyDriver::new(configs)))
}
