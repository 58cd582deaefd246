//! Elementwise averaging of spectra

use super::types::Spectrum;
use crate::error::{Error, Result};

/// Running sum of readings that share one wavelength axis
///
/// The first reading fixes the axis. Every later reading must have the same
/// length and exactly the same wavelengths, otherwise [`push`](Self::push)
/// fails with [`Error::InconsistentAxis`] and the accumulator is unchanged.
#[derive(Debug, Default)]
pub struct SpectrumAccumulator {
    wavelengths: Vec<f64>,
    sums: Vec<f64>,
    count: usize,
}

impl SpectrumAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of readings added so far
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no reading has been added
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add a reading
    pub fn push(&mut self, reading: Spectrum) -> Result<()> {
        if self.count == 0 {
            let (wavelengths, intensities) = reading.into_parts();
            self.wavelengths = wavelengths;
            self.sums = intensities;
            self.count = 1;
            return Ok(());
        }

        if reading.len() != self.wavelengths.len() {
            return Err(Error::InconsistentAxis {
                sample: self.count,
                reason: format!(
                    "expected {} pixels, got {}",
                    self.wavelengths.len(),
                    reading.len()
                ),
            });
        }

        if let Some(pixel) = self
            .wavelengths
            .iter()
            .zip(reading.wavelengths())
            .position(|(a, b)| a != b)
        {
            return Err(Error::InconsistentAxis {
                sample: self.count,
                reason: format!(
                    "pixel {} is at {} nm, expected {} nm",
                    pixel,
                    reading.wavelengths()[pixel],
                    self.wavelengths[pixel]
                ),
            });
        }

        for (sum, value) in self.sums.iter_mut().zip(reading.intensities()) {
            *sum += value;
        }
        self.count += 1;
        Ok(())
    }

    /// Divide the sums by the number of readings
    pub fn finish(self) -> Result<Spectrum> {
        if self.count == 0 {
            return Err(Error::InvalidArgument(
                "cannot average zero readings".into(),
            ));
        }

        let n = self.count as f64;
        let means = self.sums.into_iter().map(|sum| sum / n).collect();
        Spectrum::new(self.wavelengths, means)
    }
}
