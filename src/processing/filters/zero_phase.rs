// src/processing/filters/zero_phase.rs
//! Forward-backward (zero-phase) IIR filtering
//!
//! Each signal is padded on both ends by an odd extension of
//! `3 * max(len(a), len(b))` samples. Both passes start from the steady-state
//! initial conditions scaled by their first sample.

use super::{BaCoefficients, FilterError};

/// Number of samples added to each end before filtering
pub fn padlen(coeffs: &BaCoefficients) -> usize {
    3 * coeffs.a.len().max(coeffs.b.len())
}

/// Apply `coeffs` forward and backward over `signal`.
///
/// Fails with [`FilterError::SignalTooShort`] when the signal is not longer
/// than [`padlen`], and with [`FilterError::InvalidCoefficients`] when the
/// filter has no steady state (a pole at z = 1).
pub fn filtfilt(coeffs: &BaCoefficients, signal: &[f64]) -> Result<Vec<f64>, FilterError> {
    let edge = padlen(coeffs);
    if signal.len() <= edge {
        return Err(FilterError::SignalTooShort {
            len: signal.len(),
            padlen: edge,
        });
    }

    let (b, a) = normalized(coeffs);
    let zi = lfilter_zi(&b, &a)?;
    let extended = odd_extension(signal, edge);

    let x0 = extended[0];
    let mut forward = lfilter(&b, &a, &extended, zi.iter().map(|z| z * x0).collect());

    forward.reverse();
    let y0 = forward[0];
    let mut backward = lfilter(&b, &a, &forward, zi.iter().map(|z| z * y0).collect());
    backward.reverse();

    Ok(backward[edge..backward.len() - edge].to_vec())
}

/// Pad `b` and `a` to the same length and scale so that `a[0] == 1`
fn normalized(coeffs: &BaCoefficients) -> (Vec<f64>, Vec<f64>) {
    let n = coeffs.a.len().max(coeffs.b.len());
    let a0 = coeffs.a[0];

    let mut b: Vec<f64> = coeffs.b.iter().map(|v| v / a0).collect();
    let mut a: Vec<f64> = coeffs.a.iter().map(|v| v / a0).collect();
    b.resize(n, 0.0);
    a.resize(n, 0.0);
    (b, a)
}

/// Direct form II transposed filter with initial state `z`
fn lfilter(b: &[f64], a: &[f64], x: &[f64], mut z: Vec<f64>) -> Vec<f64> {
    let order = b.len() - 1;
    let mut y = Vec::with_capacity(x.len());

    for &sample in x {
        let out = b[0] * sample + z.first().copied().unwrap_or(0.0);
        for j in 0..order {
            let next = if j + 1 < order { z[j + 1] } else { 0.0 };
            z[j] = b[j + 1] * sample + next - a[j + 1] * out;
        }
        y.push(out);
    }
    y
}

/// Steady-state filter state for a unit step input
fn lfilter_zi(b: &[f64], a: &[f64]) -> Result<Vec<f64>, FilterError> {
    let order = b.len() - 1;
    if order == 0 {
        return Ok(Vec::new());
    }

    let a_sum: f64 = a.iter().sum();
    if a_sum == 0.0 || !a_sum.is_finite() {
        return Err(FilterError::InvalidCoefficients(format!(
            "denominator sums to {}, the filter has no steady state",
            a_sum
        )));
    }
    let b_sum: f64 = (1..=order).map(|k| b[k] - a[k] * b[0]).sum();

    let mut zi = vec![0.0; order];
    zi[0] = b_sum / a_sum;

    let mut a_acc = 1.0;
    let mut c_acc = 0.0;
    for k in 1..order {
        a_acc += a[k];
        c_acc += b[k] - a[k] * b[0];
        zi[k] = a_acc * zi[0] - c_acc;
    }
    Ok(zi)
}

/// Reflect `edge` samples about each end point
fn odd_extension(signal: &[f64], edge: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * edge);
    extended.extend((1..=edge).rev().map(|i| 2.0 * first - signal[i]));
    extended.extend_from_slice(signal);
    extended.extend((1..=edge).map(|i| 2.0 * last - signal[n - 1 - i]));
    extended
}
