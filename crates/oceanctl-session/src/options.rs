//! Session options

use std::time::Duration;

/// Integration time applied on connect when nothing else is configured
pub const DEFAULT_INTEGRATION_TIME_US: u32 = 10_000;

/// Pause after opening a device before issuing further commands
pub const DEFAULT_CONNECT_SETTLE: Duration = Duration::from_millis(200);

/// Pause after changing the integration time
pub const DEFAULT_CONFIG_SETTLE: Duration = Duration::from_millis(100);

/// Per-session behaviour, fixed when the session is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Report every operation at info level instead of debug
    pub verbose: bool,
    /// Integration time applied on connect (clamped into device limits)
    pub integration_time_us: u32,
    /// Delay after opening a device
    pub connect_settle: Duration,
    /// Delay after setting the integration time
    pub config_settle: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            integration_time_us: DEFAULT_INTEGRATION_TIME_US,
            connect_settle: DEFAULT_CONNECT_SETTLE,
            config_settle: DEFAULT_CONFIG_SETTLE,
        }
    }
}

impl SessionOptions {
    /// Set verbosity
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the integration time applied on connect
    pub fn integration_time_us(mut self, us: u32) -> Self {
        self.integration_time_us = us;
        self
    }

    /// Drop both settle delays (emulated hardware, tests)
    pub fn no_settle(mut self) -> Self {
        self.connect_settle = Duration::ZERO;
        self.config_settle = Duration::ZERO;
        self
    }
}
