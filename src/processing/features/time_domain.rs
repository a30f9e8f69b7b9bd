//! Time domain feature functions for EMG windows
//!
//! Vectorised functions take the whole (channel, window, sample) array and
//! reduce the sample axis, returning one value per (channel, window). Scalar
//! functions take a single window.

use ndarray::{Array2, ArrayView1, ArrayView3, Axis};

use super::Feature;
use crate::config::constants::features::DEFAULT_WAMP_THRESHOLD;

const SAMPLE_AXIS: Axis = Axis(2);

/// Root mean square
pub fn rms(windows: ArrayView3<f64>) -> Array2<f64> {
    windows.map_axis(SAMPLE_AXIS, |w| {
        (w.iter().map(|&x| x * x).sum::<f64>() / w.len() as f64).sqrt()
    })
}

/// Mean absolute value
pub fn mav(windows: ArrayView3<f64>) -> Array2<f64> {
    windows.map_axis(SAMPLE_AXIS, |w| w.iter().map(|x| x.abs()).sum::<f64>() / w.len() as f64)
}

/// Zero crossings: number of changes in sign between consecutive samples.
/// A sample of exactly zero has its own sign.
pub fn zc(windows: ArrayView3<f64>) -> Array2<f64> {
    windows.map_axis(SAMPLE_AXIS, |w| {
        w.iter().zip(w.iter().skip(1)).filter(|(a, b)| sign(**a) != sign(**b)).count() as f64
    })
}

/// Waveform length: cumulative absolute first difference
pub fn wl(windows: ArrayView3<f64>) -> Array2<f64> {
    windows.map_axis(SAMPLE_AXIS, |w| {
        w.iter().zip(w.iter().skip(1)).map(|(a, b)| (b - a).abs()).sum::<f64>()
    })
}

/// Willison amplitude: number of first differences larger than `threshold`
pub fn wamp(windows: ArrayView3<f64>, threshold: f64) -> Array2<f64> {
    windows.map_axis(SAMPLE_AXIS, |w| {
        w.iter().zip(w.iter().skip(1)).filter(|(a, b)| (*b - *a).abs() > threshold).count() as f64
    })
}

/// Population variance
pub fn var(windows: ArrayView3<f64>) -> Array2<f64> {
    windows.var_axis(SAMPLE_AXIS, 0.0)
}

/// Slope sign changes within one window
pub fn ssc(window: ArrayView1<f64>) -> f64 {
    let diff: Vec<f64> = window.iter().zip(window.iter().skip(1)).map(|(a, b)| b - a).collect();
    diff.windows(2).filter(|d| d[0] * d[1] < 0.0).count() as f64
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Names accepted by [`by_name`]
pub const FEATURE_NAMES: &[&str] = &["rms", "mav", "zc", "wl", "wamp_5", "var", "ssc"];

/// Built-in feature registration by name
pub fn by_name(name: &str) -> Option<Feature> {
    let feature = match name {
        "rms" => Feature::vectorised("rms", rms),
        "mav" => Feature::vectorised("mav", mav),
        "zc" => Feature::vectorised("zc", zc),
        "wl" => Feature::vectorised("wl", wl),
        "wamp_5" => Feature::vectorised("wamp_5", |w| wamp(w, DEFAULT_WAMP_THRESHOLD)),
        "var" => Feature::vectorised("var", var),
        "ssc" => Feature::scalar("ssc", ssc),
        _ => return None,
    };
    Some(feature)
}
