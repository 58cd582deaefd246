//! Info command implementation

use oceanctl_session::Session;

/// Print the configuration of the connected spectrometer
pub fn run_info(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let config = session.get_config()?;

    println!("Spectrometer Information");
    println!("========================");
    println!();
    println!("Model:             {}", config.model);
    println!("Serial no.:        {}", config.serial_number);
    println!("Max intensity:     {} counts", config.max_intensity);
    println!(
        "Integration limits: {} - {} us",
        config.integration_time_limits.min_us, config.integration_time_limits.max_us
    );
    println!("Integration time:  {} us", config.integration_time_us);

    if let Some(device) = session.device() {
        println!("Locator:           {}", device.locator);
    }

    Ok(())
}
