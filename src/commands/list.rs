//! List commands implementation

use oceanctl_session::{available_drivers, open_driver};

/// List all drivers compiled in
pub fn list_drivers() {
    let drivers = available_drivers();
    if drivers.is_empty() {
        println!("No drivers available (recompile with driver features enabled)");
        return;
    }

    println!("Supported drivers:");
    println!();
    for d in &drivers {
        if d.aliases.is_empty() {
            println!("  {:10} - {}", d.name, d.description);
        } else {
            println!(
                "  {:10} - {} (aliases: {})",
                d.name,
                d.description,
                d.aliases.join(", ")
            );
        }
    }
}

/// List the spectrometers a driver can see
pub fn list_devices(driver: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut driver = open_driver(driver)?;
    let devices = driver.list_devices()?;

    if devices.is_empty() {
        println!("No spectrometer found, please check connection");
        return Ok(());
    }

    println!("{:>3}  {:<16} {:<16}", "#", "Model", "Serial");
    println!("{}", "-".repeat(37));
    for (i, device) in devices.iter().enumerate() {
        println!(
            "{:>3}  {:<16} {:<16}",
            i + 1,
            device.model,
            device.serial_number
        );
    }
    Ok(())
}
