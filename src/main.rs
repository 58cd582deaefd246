//! oceanctl - Ocean Optics spectrometer control
//!
//! A thin command-line front end over `oceanctl-session`.
//!
//! # Architecture
//!
//! The vendor driver does all the USB work. oceanctl only:
//! - opens a driver backend by name (`dummy`, ...)
//! - connects a [`Session`] to one spectrometer, asking the user when
//!   several are attached
//! - configures the integration time
//! - prints single or averaged spectra

mod cli;
mod commands;
mod config;
mod prompt;

use clap::Parser;
use cli::{Cli, Commands, DeviceArgs};
use config::FileConfig;
use oceanctl_session::{open_driver, SelectIndex, SelectSerial, Session};
use prompt::PromptResolver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Log level based on verbosity
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let file_config = match FileConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::ListDrivers => {
            commands::list_drivers();
            Ok(())
        }
        Commands::List { driver } => {
            let driver = driver_spec(driver.as_deref(), &file_config)?;
            commands::list_devices(driver)
        }
        Commands::Info { device } => {
            let mut session = open_session(&device, &file_config)?;
            let result = commands::info::run_info(&session);
            finish(&mut session, result)
        }
        Commands::Acquire {
            device,
            integration_time,
            summary,
        } => {
            let mut session = open_session(&device, &file_config)?;
            let result = commands::acquire::run_acquire(&mut session, integration_time, summary);
            finish(&mut session, result)
        }
        Commands::Average {
            device,
            samples,
            integration_time,
            summary,
        } => {
            let mut session = open_session(&device, &file_config)?;
            let result =
                commands::acquire::run_average(&mut session, samples, integration_time, summary);
            finish(&mut session, result)
        }
    }
}

/// Driver from the command line, else from the configuration file
fn driver_spec<'a>(
    cli: Option<&'a str>,
    file_config: &'a FileConfig,
) -> Result<&'a str, Box<dyn std::error::Error>> {
    cli.or(file_config.session.driver.as_deref()).ok_or_else(|| {
        format!(
            "No driver specified. Use --driver or set `driver` in the [session] table of {}",
            config::DEFAULT_CONFIG_FILE
        )
        .into()
    })
}

/// Open the driver and connect a session to the selected spectrometer
fn open_session(
    args: &DeviceArgs,
    file_config: &FileConfig,
) -> Result<Session, Box<dyn std::error::Error>> {
    let driver = open_driver(driver_spec(args.driver.as_deref(), file_config)?)?;
    let session = Session::new(driver, file_config.session_options());

    let mut session = if let Some(n) = args.device {
        session.with_resolver(SelectIndex(n as usize - 1))
    } else if let Some(serial) = &args.serial {
        session.with_resolver(SelectSerial(serial.clone()))
    } else {
        session.with_resolver(PromptResolver::stdio())
    };

    session.connect()?;

    if let Err(e) = check_selection(args, &session) {
        session.disconnect()?;
        return Err(e.into());
    }

    Ok(session)
}

/// Verify that the connected device is the one asked for
///
/// The resolver is only consulted with several devices attached, so a lone
/// device is picked regardless of `--device` or `--serial`.
fn check_selection(args: &DeviceArgs, session: &Session) -> Result<(), String> {
    let (Some(device), Some((_, attached))) = (session.device(), session.device_position())
    else {
        return Ok(());
    };

    if let Some(n) = args.device {
        if n as usize > attached {
            return Err(format!(
                "spectrometer number {} out of range (1-{})",
                n, attached
            ));
        }
    }
    if let Some(serial) = &args.serial {
        if &device.serial_number != serial {
            return Err(format!(
                "no spectrometer with serial number {} (found {})",
                serial, device
            ));
        }
    }
    Ok(())
}

/// Disconnect, reporting the command's error first if there was one
fn finish(
    session: &mut Session,
    result: Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let disconnected = session.disconnect();
    if let (Err(_), Err(e)) = (&result, &disconnected) {
        log::warn!("Disconnect failed: {}", e);
    }
    result?;
    disconnected?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceanctl_session::SessionOptions;

    fn connected(driver: &str, args: &DeviceArgs) -> Session {
        let driver = open_driver(driver).unwrap();
        let mut session = Session::new(driver, SessionOptions::default().no_settle());
        match args.device {
            Some(n) => session
                .connect_with(&mut SelectIndex(n as usize - 1))
                .unwrap(),
            None => session.connect().unwrap(),
        }
        session
    }

    #[test]
    fn test_device_number_with_single_device() {
        let args = DeviceArgs {
            device: Some(5),
            ..DeviceArgs::default()
        };
        let session = connected("dummy", &args);
        let err = check_selection(&args, &session).unwrap_err();
        assert!(err.contains("out of range (1-1)"));

        let args = DeviceArgs {
            device: Some(1),
            ..DeviceArgs::default()
        };
        let session = connected("dummy", &args);
        assert!(check_selection(&args, &session).is_ok());
    }

    #[test]
    fn test_device_number_with_several_devices() {
        let args = DeviceArgs {
            device: Some(2),
            ..DeviceArgs::default()
        };
        let session = connected("dummy:devices=3", &args);
        assert!(check_selection(&args, &session).is_ok());
        assert_eq!(session.device_position(), Some((1, 3)));
    }

    #[test]
    fn test_serial_with_single_device() {
        let args = DeviceArgs {
            serial: Some("NOPE".into()),
            ..DeviceArgs::default()
        };
        let session = connected("dummy", &args);
        let err = check_selection(&args, &session).unwrap_err();
        assert!(err.contains("NOPE"));

        let args = DeviceArgs {
            serial: Some("USB2+F00000".into()),
            ..DeviceArgs::default()
        };
        assert!(check_selection(&args, &session).is_ok());
    }
}
