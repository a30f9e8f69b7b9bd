// src/processing/task.rs
//! The two-phase stage lifecycle shared by every pipeline task

use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::error::PreprocessResult;

/// A preprocessing stage.
///
/// `setup` validates the static configuration and derives any precomputed state.
/// `process` is then a pure transformation from one array to another and may be
/// called any number of times.
pub trait PreprocessTask: Send + Sync {
    /// Validate configuration and precompute derived state
    fn setup(&mut self) -> PreprocessResult<()>;

    /// Transform `data` into this stage's output
    fn process(&self, data: ArrayD<f64>) -> PreprocessResult<ArrayD<f64>>;

    /// Stage name used in log records
    fn name(&self) -> &'static str;
}

/// What a stage does with unit-length axes of its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapePolicy {
    /// Drop every axis of length 1. A single channel or a single window
    /// therefore lowers the rank of the result.
    #[default]
    Squeeze,
    /// Always return the full (channel, window, ...) rank
    Keep,
}

impl ShapePolicy {
    pub(crate) fn apply(self, data: ArrayD<f64>) -> ArrayD<f64> {
        match self {
            ShapePolicy::Squeeze => squeeze(data),
            ShapePolicy::Keep => data,
        }
    }
}

/// Remove all axes of length 1
pub fn squeeze(mut data: ArrayD<f64>) -> ArrayD<f64> {
    for axis in (0..data.ndim()).rev() {
        if data.len_of(Axis(axis)) == 1 {
            data = data.index_axis_move(Axis(axis), 0);
        }
    }
    data
}
