//! Interactive device selection

use std::io::{self, BufRead, Write};

use oceanctl_session::{DeviceDescriptor, DeviceResolver, Error, Result};

/// Asks the user to pick a spectrometer by number
///
/// Prints a 1-based list and keeps asking until a valid number is entered.
/// End of input aborts the selection.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl PromptResolver<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read from stdin (stdout stays free for data)
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    /// Create a resolver over arbitrary streams
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, devices: &[DeviceDescriptor]) -> io::Result<Option<usize>> {
        writeln!(self.output, "Multiple spectrometers found:")?;
        for (i, device) in devices.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, device)?;
        }

        let mut line = String::new();
        loop {
            write!(
                self.output,
                "Please enter spectrometer number (1-{}): ",
                devices.len()
            )?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=devices.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "Invalid input, please enter a valid number")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> DeviceResolver for PromptResolver<R, W> {
    fn resolve(&mut self, devices: &[DeviceDescriptor]) -> Result<usize> {
        match self.ask(devices) {
            Ok(Some(index)) => Ok(index),
            Ok(None) => Err(Error::InvalidArgument(
                "no spectrometer selected (end of input)".into(),
            )),
            Err(e) => Err(Error::InvalidArgument(format!(
                "failed to read device selection: {}",
                e
            ))),
        }
    }
}
