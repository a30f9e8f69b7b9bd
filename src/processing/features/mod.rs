//! EMG feature extraction stage
//!
//! [`TdExtractor`] turns a (channel, window, sample) array into a
//! (channel, window, feature) array. Each registered [`Feature`] fills one
//! slice of the feature axis, in registration order:
//! - vectorised features are called once with the whole windowed array
//! - scalar features are called once per (channel, window) lane

pub mod time_domain;

use ndarray::{Array2, Array3, ArrayD, ArrayView1, ArrayView3, Axis, Ix3, Zip};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{PreprocessErrorBuilder, PreprocessResult, ProcessingStage};
use crate::processing::task::{PreprocessTask, ShapePolicy};

const COMPONENT: &str = "td_extractor";

/// Feature computed over every window at once
pub type VectorisedFn = Arc<dyn Fn(ArrayView3<f64>) -> Array2<f64> + Send + Sync>;

/// Feature computed over a single window
pub type ScalarFn = Arc<dyn Fn(ArrayView1<f64>) -> f64 + Send + Sync>;

/// Calling convention of a feature function
#[derive(Clone)]
pub enum FeatureKind {
    Vectorised(VectorisedFn),
    Scalar(ScalarFn),
}

/// A named feature function
#[derive(Clone)]
pub struct Feature {
    name: String,
    kind: FeatureKind,
}

impl Feature {
    pub fn vectorised<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ArrayView3<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: FeatureKind::Vectorised(Arc::new(f)),
        }
    }

    pub fn scalar<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ArrayView1<f64>) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: FeatureKind::Scalar(Arc::new(f)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FeatureKind {
        &self.kind
    }

    pub fn is_vectorised(&self) -> bool {
        matches!(self.kind, FeatureKind::Vectorised(_))
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("vectorised", &self.is_vectorised())
            .finish()
    }
}

/// Time domain feature extractor
#[derive(Debug, Clone, Default)]
pub struct TdExtractor {
    features: Vec<Feature>,
    shape_policy: ShapePolicy,
}

impl TdExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape_policy(mut self, policy: ShapePolicy) -> Self {
        self.shape_policy = policy;
        self
    }

    /// Register a function reducing the last axis of the whole windowed array
    pub fn add_vectorised_feature<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(ArrayView3<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        self.add_feature(Feature::vectorised(name, f));
    }

    /// Register a function reducing a single window to one value
    pub fn add_scalar_feature<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(ArrayView1<f64>) -> f64 + Send + Sync + 'static,
    {
        self.add_feature(Feature::scalar(name, f));
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Register several features, keeping their order
    pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.features.extend(features);
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(Feature::name).collect()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl PreprocessTask for TdExtractor {
    fn setup(&mut self) -> PreprocessResult<()> {
        if self.features.is_empty() {
            return Err(PreprocessErrorBuilder::new(COMPONENT, "setup")
                .configuration("no features have been added"));
        }
        debug!(features = ?self.feature_names(), "feature extractor ready");
        Ok(())
    }

    fn process(&self, data: ArrayD<f64>) -> PreprocessResult<ArrayD<f64>> {
        let rank = data.ndim();
        let data = match rank {
            2 => data.insert_axis(Axis(0)),
            3 => data,
            _ => {
                return Err(PreprocessErrorBuilder::new(COMPONENT, "process").dimension(
                    ProcessingStage::FeatureExtraction,
                    "rank 2 (window, sample) or 3 (channel, window, sample)",
                    rank,
                ))
            }
        };
        let data = data.into_dimensionality::<Ix3>().map_err(|_| {
            PreprocessErrorBuilder::new(COMPONENT, "process").dimension(
                ProcessingStage::FeatureExtraction,
                "rank 3",
                rank,
            )
        })?;

        let (channels, windows, _) = data.dim();
        let mut res = Array3::<f64>::zeros((channels, windows, self.features.len()));

        for (i, feature) in self.features.iter().enumerate() {
            let mut slot = res.index_axis_mut(Axis(2), i);
            match &feature.kind {
                FeatureKind::Vectorised(f) => {
                    let values = f(data.view());
                    if values.dim() != (channels, windows) {
                        let reason = format!(
                            "feature '{}' returned shape {:?}, expected {:?}",
                            feature.name,
                            values.shape(),
                            [channels, windows]
                        );
                        return Err(
                            PreprocessErrorBuilder::new(COMPONENT, "process").configuration(reason)
                        );
                    }
                    slot.assign(&values);
                }
                FeatureKind::Scalar(f) => {
                    Zip::from(&mut slot)
                        .and(data.lanes(Axis(2)))
                        .for_each(|out, window| *out = f(window));
                }
            }
        }

        debug!(channels, windows, features = self.features.len(), "extracted features");
        Ok(self.shape_policy.apply(res.into_dyn()))
    }

    fn name(&self) -> &'static str {
        COMPONENT
    }
}
