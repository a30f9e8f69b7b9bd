// src/processing/windowing.rs
//! Fixed-length overlapping windowing of multichannel signals

use ndarray::{s, Array3, ArrayD, Axis, Ix2};
use tracing::debug;

use crate::error::{PreprocessErrorBuilder, PreprocessResult, ProcessingStage};
use crate::processing::task::{PreprocessTask, ShapePolicy};

const COMPONENT: &str = "windower";

/// Slices a (channel, sample) signal into overlapping windows
#[derive(Debug, Clone)]
pub struct Windower {
    data_len: usize,
    win_len: usize,
    overlap: usize,
    shape_policy: ShapePolicy,
    windows: Option<Vec<(usize, usize)>>,
}

impl Windower {
    /// Create a windower for signals of `data_len` samples.
    ///
    /// Windows are `win_len` samples long and consecutive windows share
    /// `overlap` samples.
    pub fn new(data_len: usize, win_len: usize, overlap: usize) -> Self {
        Self {
            data_len,
            win_len,
            overlap,
            shape_policy: ShapePolicy::default(),
            windows: None,
        }
    }

    pub fn with_shape_policy(mut self, policy: ShapePolicy) -> Self {
        self.shape_policy = policy;
        self
    }

    /// Window index pairs, available after `setup`
    pub fn windows(&self) -> Option<&[(usize, usize)]> {
        self.windows.as_deref()
    }

    pub fn window_count(&self) -> usize {
        self.windows.as_ref().map_or(0, Vec::len)
    }

    /// Distance between consecutive window starts
    pub fn step(&self) -> usize {
        self.win_len.saturating_sub(self.overlap)
    }

    pub fn win_len(&self) -> usize {
        self.win_len
    }
}

impl PreprocessTask for Windower {
    fn setup(&mut self) -> PreprocessResult<()> {
        if self.data_len == 0
            || self.win_len == 0
            || self.win_len > self.data_len
            || self.overlap >= self.win_len
        {
            return Err(PreprocessErrorBuilder::new(COMPONENT, "setup").configuration(format!(
                "invalid windowing: data_len={}, win_len={}, overlap={}",
                self.data_len, self.win_len, self.overlap
            )));
        }

        let step = self.step();
        let windows: Vec<(usize, usize)> = (0..=self.data_len - self.win_len)
            .step_by(step)
            .map(|start| (start, start + self.win_len))
            .collect();

        debug!(
            data_len = self.data_len,
            win_len = self.win_len,
            step,
            windows = windows.len(),
            "windower ready"
        );
        self.windows = Some(windows);
        Ok(())
    }

    fn process(&self, data: ArrayD<f64>) -> PreprocessResult<ArrayD<f64>> {
        let windows = self.windows.as_ref().ok_or_else(|| {
            PreprocessErrorBuilder::new(COMPONENT, "process")
                .configuration("process called before setup")
        })?;

        let rank = data.ndim();
        let data = match rank {
            1 => data.insert_axis(Axis(0)),
            2 => data,
            _ => {
                return Err(PreprocessErrorBuilder::new(COMPONENT, "process").dimension(
                    ProcessingStage::Windowing,
                    "rank 1 or 2 (channel, sample)",
                    rank,
                ))
            }
        };
        let data = data.into_dimensionality::<Ix2>().map_err(|_| {
            PreprocessErrorBuilder::new(COMPONENT, "process").dimension(
                ProcessingStage::Windowing,
                "rank 2",
                rank,
            )
        })?;

        let samples = data.len_of(Axis(1));
        if let Some(&(_, last_end)) = windows.last() {
            if samples < last_end {
                return Err(PreprocessErrorBuilder::new(COMPONENT, "process").configuration(format!(
                    "signal has {} samples but windows span {}",
                    samples, last_end
                )));
            }
        }

        let channels = data.len_of(Axis(0));
        let mut windowed = Array3::<f64>::zeros((channels, windows.len(), self.win_len));
        for (mut out, lane) in windowed.outer_iter_mut().zip(data.outer_iter()) {
            for (i, &(start, end)) in windows.iter().enumerate() {
                out.slice_mut(s![i, ..]).assign(&lane.slice(s![start..end]));
            }
        }

        debug!(channels, windows = windows.len(), win_len = self.win_len, "windowed signal");
        Ok(self.shape_policy.apply(windowed.into_dyn()))
    }

    fn name(&self) -> &'static str {
        COMPONENT
    }
}
