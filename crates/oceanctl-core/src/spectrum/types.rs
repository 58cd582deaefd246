//! Spectrum data types

use core::time::Duration;

use crate::error::{Error, Result};

/// One acquisition: a wavelength axis (nm) and the intensities measured on it
///
/// Both sequences always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl Spectrum {
    /// Create a spectrum from its two axes
    ///
    /// Fails with [`Error::InvalidArgument`] if the lengths differ.
    pub fn new(wavelengths: Vec<f64>, intensities: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != intensities.len() {
            return Err(Error::InvalidArgument(format!(
                "{} wavelengths but {} intensities",
                wavelengths.len(),
                intensities.len()
            )));
        }
        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Whether the spectrum has no pixels
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Wavelength axis in nanometers
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Intensities in detector counts
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Iterate over `(wavelength, intensity)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    /// The `(wavelength, intensity)` pair with the highest intensity
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter()
            .fold(None, |best: Option<(f64, f64)>, (w, i)| match best {
                Some((_, bi)) if bi >= i => best,
                _ => Some((w, i)),
            })
    }

    /// Split into `(wavelengths, intensities)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.wavelengths, self.intensities)
    }
}

/// Mean of several readings taken on the same wavelength axis
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedSpectrum {
    /// The averaged spectrum
    pub spectrum: Spectrum,
    /// Number of readings that went into the average
    pub samples: usize,
    /// Wall-clock time spent acquiring and averaging
    pub elapsed: Duration,
}

impl AveragedSpectrum {
    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Spectrum::new(vec![400.0, 401.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_peak() {
        let s = Spectrum::new(vec![400.0, 500.0, 600.0], vec![1.0, 9.0, 3.0]).unwrap();
        assert_eq!(s.peak(), Some((500.0, 9.0)));

        let empty = Spectrum::new(vec![], vec![]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.peak(), None);
    }

    #[test]
    fn test_into_parts() {
        let s = Spectrum::new(vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        let (w, i) = s.into_parts();
        assert_eq!(w, vec![1.0, 2.0]);
        assert_eq!(i, vec![3.0, 4.0]);
    }
}
