//! High-level spectrometer session
//!
//! This crate is what front ends talk to. It hides driver backends behind
//! a registry and wraps one open device in a [`Session`] that knows how to
//! configure it, take single spectra and average repeated readings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   CLI (bin/oceanctl)                      │
//! │  - Picks a driver string, supplies a DeviceResolver       │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │               oceanctl-session (this crate)               │
//! │  - Session: connect / configure / acquire / average       │
//! │  - Registry: opens drivers by name                        │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//!             ┌───────────────┴───────────────┐
//!             ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │     oceanctl-core        │   │  Driver crates           │
//! │  - Driver traits         │   │  - dummy                 │
//! │  - Spectrum, averaging   │   │  - implement the traits  │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use oceanctl_session::{open_driver, SelectIndex, Session, SessionOptions};
//!
//! let driver = open_driver("dummy:devices=2")?;
//! let mut session = Session::new(driver, SessionOptions::default())
//!     .with_resolver(SelectIndex(1));
//! session.connect()?;
//! let averaged = session.take_average(10)?;
//! println!("averaged in {:.2} s", averaged.elapsed_secs());
//! ```

mod options;
mod registry;
mod resolver;
mod session;

pub use options::{
    SessionOptions, DEFAULT_CONFIG_SETTLE, DEFAULT_CONNECT_SETTLE, DEFAULT_INTEGRATION_TIME_US,
};
pub use registry::{
    available_drivers, driver_names_short, open_driver, parse_driver_params, DriverInfo,
    DriverParams,
};
pub use resolver::{DeviceResolver, RejectAmbiguous, SelectIndex, SelectSerial};
pub use session::{ConfigSnapshot, Session, SessionState};

// Re-export core types that front ends need
pub use oceanctl_core::driver::{DeviceDescriptor, IntegrationTimeLimits};
pub use oceanctl_core::spectrum::{AveragedSpectrum, Spectrum};
pub use oceanctl_core::{Error, ErrorKind, Result};
