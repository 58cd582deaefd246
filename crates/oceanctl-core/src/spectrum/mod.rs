//! Spectrum readings and averaging

mod average;
mod types;

pub use average::SpectrumAccumulator;
pub use types::{AveragedSpectrum, Spectrum};
