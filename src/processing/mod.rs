// src/processing/mod.rs
//! Signal preprocessing stages and the pipeline that sequences them

pub mod features;
pub mod filters;
pub mod pipeline;
pub mod task;
pub mod windowing;

pub use features::{time_domain, Feature, FeatureKind, TdExtractor};
pub use filters::{BaCoefficients, BandType, FilterError, SignalFilter};
pub use pipeline::SignalPreprocessor;
pub use task::{squeeze, PreprocessTask, ShapePolicy};
pub use windowing::Windower;
