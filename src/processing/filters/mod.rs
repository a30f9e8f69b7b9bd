// src/processing/filters/mod.rs
//! Zero-phase IIR filter cascade

pub mod coefficients;
pub mod zero_phase;

pub use coefficients::{butter, iirnotch};
pub use zero_phase::{filtfilt, padlen};

use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::constants::filtering::{DEFAULT_FILTER_ORDER, DEFAULT_NOTCH_Q};
use crate::error::{PreprocessError, PreprocessErrorBuilder, PreprocessResult, ProcessingStage};
use crate::processing::task::PreprocessTask;

const COMPONENT: &str = "signal_filter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandType {
    Lowpass,
    Highpass,
    Bandpass,
}

/// Transfer function coefficients of an IIR filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaCoefficients {
    /// Feed-forward (numerator) coefficients
    pub b: Vec<f64>,
    /// Feedback (denominator) coefficients
    pub a: Vec<f64>,
}

impl BaCoefficients {
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> Result<Self, FilterError> {
        let coeffs = Self { b, a };
        coeffs.validate()?;
        Ok(coeffs)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.b.is_empty() || self.a.is_empty() {
            return Err(FilterError::InvalidCoefficients("b and a must not be empty".to_string()));
        }
        if self.a[0] == 0.0 {
            return Err(FilterError::InvalidCoefficients("a[0] must be nonzero".to_string()));
        }
        if self.b.iter().chain(&self.a).any(|v| !v.is_finite()) {
            return Err(FilterError::InvalidCoefficients("coefficients must be finite".to_string()));
        }
        Ok(())
    }
}

/// Filter design and filtering errors
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid coefficients: {0}")]
    InvalidCoefficients(String),
    #[error("The length of the input ({len}) must be greater than padlen ({padlen})")]
    SignalTooShort { len: usize, padlen: usize },
}

impl FilterError {
    fn into_preprocess(self, operation: &str) -> PreprocessError {
        let builder = PreprocessErrorBuilder::new(COMPONENT, operation);
        match self {
            FilterError::SignalTooShort { len, padlen } => {
                builder.filtering("segment too short for zero-phase filtering", len, padlen)
            }
            other => builder.configuration(other.to_string()),
        }
    }
}

/// Ordered cascade of IIR filters applied with zero-phase filtering along the
/// last (sample) axis.
#[derive(Debug, Clone)]
pub struct SignalFilter {
    fs: f64,
    filters: Vec<BaCoefficients>,
}

impl SignalFilter {
    /// Create an empty cascade for signals sampled at `fs` Hz
    pub fn new(fs: f64) -> Self {
        Self {
            fs,
            filters: Vec::new(),
        }
    }

    pub fn fs(&self) -> f64 {
        self.fs
    }

    pub fn filters(&self) -> &[BaCoefficients] {
        &self.filters
    }

    fn nyquist_normalized(&self, freq: f64) -> f64 {
        freq / (0.5 * self.fs)
    }

    /// Butterworth lowpass at `cutoff` Hz
    pub fn add_lowpass(&mut self, cutoff: f64, order: usize) -> PreprocessResult<()> {
        let coeffs = butter(order, &[self.nyquist_normalized(cutoff)], BandType::Lowpass)
            .map_err(|e| e.into_preprocess("add_lowpass"))?;
        self.push(coeffs, "lowpass");
        Ok(())
    }

    /// Butterworth highpass at `cutoff` Hz
    pub fn add_highpass(&mut self, cutoff: f64, order: usize) -> PreprocessResult<()> {
        let coeffs = butter(order, &[self.nyquist_normalized(cutoff)], BandType::Highpass)
            .map_err(|e| e.into_preprocess("add_highpass"))?;
        self.push(coeffs, "highpass");
        Ok(())
    }

    /// Butterworth bandpass between `lowcut` and `highcut` Hz
    pub fn add_bandpass(
        &mut self,
        lowcut: f64,
        highcut: f64,
        order: usize,
    ) -> PreprocessResult<()> {
        let wn = [self.nyquist_normalized(lowcut), self.nyquist_normalized(highcut)];
        let coeffs = butter(order, &wn, BandType::Bandpass)
            .map_err(|e| e.into_preprocess("add_bandpass"))?;
        self.push(coeffs, "bandpass");
        Ok(())
    }

    /// IIR notch at `notch_freq` Hz with quality factor `q`
    pub fn add_notch(&mut self, notch_freq: f64, q: f64) -> PreprocessResult<()> {
        let coeffs = iirnotch(notch_freq, q, self.fs).map_err(|e| e.into_preprocess("add_notch"))?;
        self.push(coeffs, "notch");
        Ok(())
    }

    /// Register custom `ba` coefficients
    pub fn add_filter(&mut self, coeffs: BaCoefficients) -> PreprocessResult<()> {
        coeffs.validate().map_err(|e| e.into_preprocess("add_filter"))?;
        self.push(coeffs, "custom");
        Ok(())
    }

    /// Lowpass with the default order
    pub fn add_default_lowpass(&mut self, cutoff: f64) -> PreprocessResult<()> {
        self.add_lowpass(cutoff, DEFAULT_FILTER_ORDER)
    }

    /// Highpass with the default order
    pub fn add_default_highpass(&mut self, cutoff: f64) -> PreprocessResult<()> {
        self.add_highpass(cutoff, DEFAULT_FILTER_ORDER)
    }

    /// Bandpass with the default order
    pub fn add_default_bandpass(&mut self, lowcut: f64, highcut: f64) -> PreprocessResult<()> {
        self.add_bandpass(lowcut, highcut, DEFAULT_FILTER_ORDER)
    }

    /// Notch with the default quality factor
    pub fn add_default_notch(&mut self, notch_freq: f64) -> PreprocessResult<()> {
        self.add_notch(notch_freq, DEFAULT_NOTCH_Q)
    }

    fn push(&mut self, coeffs: BaCoefficients, kind: &str) {
        debug!(kind, b_len = coeffs.b.len(), a_len = coeffs.a.len(), "filter added");
        self.filters.push(coeffs);
    }
}

impl PreprocessTask for SignalFilter {
    fn setup(&mut self) -> PreprocessResult<()> {
        if !(self.fs.is_finite() && self.fs > 0.0) {
            return Err(PreprocessErrorBuilder::new(COMPONENT, "setup")
                .configuration(format!("sampling frequency must be positive, got {}", self.fs)));
        }
        if self.filters.is_empty() {
            warn!(fs = self.fs, "no filters have been added, signal will pass through unchanged");
        }
        Ok(())
    }

    fn process(&self, data: ArrayD<f64>) -> PreprocessResult<ArrayD<f64>> {
        if self.filters.is_empty() {
            return Ok(data);
        }
        if data.ndim() == 0 {
            return Err(PreprocessErrorBuilder::new(COMPONENT, "process").dimension(
                ProcessingStage::Filtering,
                "rank >= 1 with samples on the last axis",
                0,
            ));
        }

        let axis = Axis(data.ndim() - 1);
        let mut res = data;
        for coeffs in &self.filters {
            for mut lane in res.lanes_mut(axis) {
                let segment = lane.to_vec();
                let filtered =
                    filtfilt(coeffs, &segment).map_err(|e| e.into_preprocess("process"))?;
                lane.iter_mut().zip(filtered).for_each(|(dst, v)| *dst = v);
            }
        }

        debug!(shape = ?res.shape(), filters = self.filters.len(), "filtered signal");
        Ok(res)
    }

    fn name(&self) -> &'static str {
        COMPONENT
    }
}
