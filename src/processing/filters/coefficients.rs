// src/processing/filters/coefficients.rs
//! IIR coefficient design
//!
//! Butterworth designs follow the classic analog-prototype route: place the
//! prototype poles on the unit circle, move them to the requested band with a
//! pre-warped frequency transform, map them to the z-plane with the bilinear
//! transform and expand zeros and poles into `ba` polynomials. Cutoffs are
//! normalized so that 1.0 is the Nyquist frequency.

use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

use super::{BaCoefficients, BandType, FilterError};

/// Sampling rate used during design. Cutoffs are normalized to Nyquist, so
/// Nyquist is 1 here.
const DESIGN_FS: f64 = 2.0;

/// Zero/pole/gain representation used between design steps
struct Zpk {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
}

/// Design a digital Butterworth filter.
///
/// `wn` holds one normalized cutoff for lowpass/highpass and two
/// (low, high) for bandpass. Cutoffs are fractions of Nyquist.
pub fn butter(order: usize, wn: &[f64], band: BandType) -> Result<BaCoefficients, FilterError> {
    if order == 0 {
        return Err(FilterError::InvalidParameters("filter order must be at least 1".to_string()));
    }
    if let Some(&w) = wn.iter().find(|&&w| !(w > 0.0 && w < 1.0)) {
        return Err(FilterError::InvalidParameters(format!(
            "digital filter critical frequencies must be 0 < Wn < 1, got {}",
            w
        )));
    }

    let expected = match band {
        BandType::Lowpass | BandType::Highpass => 1,
        BandType::Bandpass => 2,
    };
    if wn.len() != expected {
        return Err(FilterError::InvalidParameters(format!(
            "{:?} needs {} critical frequencies, got {}",
            band,
            expected,
            wn.len()
        )));
    }

    let warped: Vec<f64> =
        wn.iter().map(|&w| 2.0 * DESIGN_FS * (PI * w / DESIGN_FS).tan()).collect();
    let prototype = butter_prototype(order);

    let analog = match band {
        BandType::Lowpass => lowpass_to_lowpass(prototype, warped[0]),
        BandType::Highpass => lowpass_to_highpass(prototype, warped[0]),
        BandType::Bandpass => {
            if warped[0] >= warped[1] {
                return Err(FilterError::InvalidParameters(
                    "low cutoff must be less than high cutoff".to_string(),
                ));
            }
            let bandwidth = warped[1] - warped[0];
            let center = (warped[0] * warped[1]).sqrt();
            lowpass_to_bandpass(prototype, center, bandwidth)
        }
    };

    Ok(zpk_to_ba(bilinear(analog, DESIGN_FS)))
}

/// Design a second-order IIR notch at `freq` Hz with quality factor `q`.
///
/// The -3 dB bandwidth is `freq / q`.
pub fn iirnotch(freq: f64, q: f64, fs: f64) -> Result<BaCoefficients, FilterError> {
    if !(q > 0.0) {
        return Err(FilterError::InvalidParameters(format!(
            "quality factor must be positive, got {}",
            q
        )));
    }
    let w0 = 2.0 * freq / fs;
    if !(w0 > 0.0 && w0 < 1.0) {
        return Err(FilterError::InvalidParameters(format!(
            "notch frequency must lie strictly between 0 and Nyquist, got {} Hz at fs {} Hz",
            freq, fs
        )));
    }

    let bandwidth = w0 / q * PI;
    let w0 = w0 * PI;

    // Attenuation at the band edges is -3 dB, so gb = 1/sqrt(2) and the
    // beta scaling term reduces to tan(bw / 2).
    let beta = (bandwidth / 2.0).tan();
    let gain = 1.0 / (1.0 + beta);
    let cos_w0 = w0.cos();

    Ok(BaCoefficients {
        b: vec![gain, -2.0 * gain * cos_w0, gain],
        a: vec![1.0, -2.0 * gain * cos_w0, 2.0 * gain - 1.0],
    })
}

fn butter_prototype(order: usize) -> Zpk {
    let n = order as f64;
    let poles = (0..order)
        .map(|k| {
            let m = -(n - 1.0) + 2.0 * k as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect();

    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

fn lowpass_to_lowpass(zpk: Zpk, wo: f64) -> Zpk {
    let degree = zpk.poles.len() - zpk.zeros.len();
    Zpk {
        zeros: zpk.zeros.iter().map(|z| z * wo).collect(),
        poles: zpk.poles.iter().map(|p| p * wo).collect(),
        gain: zpk.gain * wo.powi(degree as i32),
    }
}

fn lowpass_to_highpass(zpk: Zpk, wo: f64) -> Zpk {
    let degree = zpk.poles.len() - zpk.zeros.len();
    let wo = Complex64::new(wo, 0.0);

    let num: Complex64 = zpk.zeros.iter().map(|z| -z).product();
    let den: Complex64 = zpk.poles.iter().map(|p| -p).product();

    let mut zeros: Vec<Complex64> = zpk.zeros.iter().map(|z| wo / z).collect();
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: zpk.poles.iter().map(|p| wo / p).collect(),
        gain: zpk.gain * (num / den).re,
    }
}

fn lowpass_to_bandpass(zpk: Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = zpk.poles.len() - zpk.zeros.len();
    let wo2 = Complex64::new(wo * wo, 0.0);

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let scaled: Vec<Complex64> = roots.iter().map(|r| r * (bw / 2.0)).collect();
        let upper = scaled.iter().map(|r| r + (r * r - wo2).sqrt());
        let lower = scaled.iter().map(|r| r - (r * r - wo2).sqrt());
        upper.chain(lower).collect()
    };

    let mut zeros = split(&zpk.zeros);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: split(&zpk.poles),
        gain: zpk.gain * bw.powi(degree as i32),
    }
}

fn bilinear(zpk: Zpk, fs: f64) -> Zpk {
    let degree = zpk.poles.len() - zpk.zeros.len();
    let fs2 = Complex64::new(2.0 * fs, 0.0);

    let num: Complex64 = zpk.zeros.iter().map(|z| fs2 - z).product();
    let den: Complex64 = zpk.poles.iter().map(|p| fs2 - p).product();

    let mut zeros: Vec<Complex64> = zpk.zeros.iter().map(|z| (fs2 + z) / (fs2 - z)).collect();
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: zpk.poles.iter().map(|p| (fs2 + p) / (fs2 - p)).collect(),
        gain: zpk.gain * (num / den).re,
    }
}

fn zpk_to_ba(zpk: Zpk) -> BaCoefficients {
    let b = poly(&zpk.zeros).into_iter().map(|c| c * zpk.gain).collect();
    let a = poly(&zpk.poles);
    BaCoefficients { b, a }
}

/// Real polynomial coefficients (highest power first) with the given roots.
/// Roots come in conjugate pairs, so imaginary parts cancel.
fn poly(roots: &[Complex64]) -> Vec<f64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs.into_iter().map(|c| c.re).collect()
}
