//! Acquire and average command implementations

use indicatif::{ProgressBar, ProgressStyle};
use oceanctl_session::{Session, Spectrum};
use std::io::{self, BufWriter, Write};

/// Acquire one spectrum and print it
pub fn run_acquire(
    session: &mut Session,
    integration_time: Option<u32>,
    summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(us) = integration_time {
        session.set_integration_time(us)?;
    }

    let spectrum = session.take_spectrum()?;
    print_result(session, &spectrum, summary)
}

/// Acquire `samples` spectra, average them and print the result
pub fn run_average(
    session: &mut Session,
    samples: i64,
    integration_time: Option<u32>,
    summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(us) = integration_time {
        session.set_integration_time(us)?;
    }

    let pb = ProgressBar::new(u64::try_from(samples).unwrap_or(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} spectra ({eta})")?
            .progress_chars("#>-"),
    );

    let averaged = match session
        .take_average_with_progress(samples, |done, _| pb.set_position(done as u64))
    {
        Ok(averaged) => {
            pb.finish_and_clear();
            averaged
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    eprintln!(
        "Averaged {} spectra in {:.2} s",
        averaged.samples,
        averaged.elapsed_secs()
    );
    print_result(session, &averaged.spectrum, summary)
}

fn print_result(
    session: &Session,
    spectrum: &Spectrum,
    summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = session.get_config()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if summary {
        write_summary(&mut out, spectrum, config.max_intensity)?;
    } else {
        write_table(&mut out, spectrum)?;
    }
    out.flush()?;
    Ok(())
}

/// Tab-separated `wavelength intensity` table
fn write_table<W: Write>(out: &mut W, spectrum: &Spectrum) -> io::Result<()> {
    writeln!(out, "# wavelength_nm\tintensity")?;
    for (w, i) in spectrum.iter() {
        writeln!(out, "{:.3}\t{:.2}", w, i)?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, spectrum: &Spectrum, max_intensity: f64) -> io::Result<()> {
    let wavelengths = spectrum.wavelengths();
    writeln!(out, "Pixels:     {}", spectrum.len())?;
    if let (Some(first), Some(last)) = (wavelengths.first(), wavelengths.last()) {
        writeln!(out, "Range:      {:.2} - {:.2} nm", first, last)?;
    }
    if let Some((w, i)) = spectrum.peak() {
        writeln!(out, "Peak:       {:.2} counts at {:.2} nm", i, w)?;
        if i >= max_intensity {
            writeln!(out, "Warning:    detector saturated, reduce the integration time")?;
        }
    }
    let mean = if spectrum.is_empty() {
        0.0
    } else {
        spectrum.intensities().iter().sum::<f64>() / spectrum.len() as f64
    };
    writeln!(out, "Mean:       {:.2} counts", mean)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> Spectrum {
        Spectrum::new(vec![400.0, 500.0, 600.0], vec![10.0, 30.0, 20.0]).unwrap()
    }

    #[test]
    fn test_write_table() {
        let mut out = Vec::new();
        write_table(&mut out, &spectrum()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "400.000\t10.00");
        assert_eq!(lines[3], "600.000\t20.00");
    }

    #[test]
    fn test_write_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, &spectrum(), 65535.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pixels:     3"));
        assert!(text.contains("30.00 counts at 500.00 nm"));
        assert!(text.contains("Mean:       20.00 counts"));
        assert!(!text.contains("saturated"));
    }

    #[test]
    fn test_write_summary_saturated() {
        let mut out = Vec::new();
        write_summary(&mut out, &spectrum(), 30.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("saturated"));
    }
}
