//! EMG-Preprocess: multichannel EMG signal preprocessing
//!
//! This library turns raw multichannel EMG recordings into per-window feature
//! matrices. It provides:
//!
//! - A two-phase task abstraction (`setup` then `process`)
//! - Overlapping windowing of (channel, sample) signals
//! - Zero-phase Butterworth and notch filter cascades
//! - Time domain feature extraction with vectorised and per-window features
//! - A sequencing pipeline and a TOML driven way of building one
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_preprocess::processing::{
//!     time_domain, SignalFilter, SignalPreprocessor, TdExtractor, Windower,
//! };
//! use ndarray::Array2;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut filter = SignalFilter::new(200.0);
//!     filter.add_bandpass(5.0, 95.0, 5)?;
//!     filter.add_notch(50.0, 30.0)?;
//!
//!     let mut extractor = TdExtractor::new();
//!     let names = ["mav", "wl", "wamp_5", "ssc"];
//!     extractor.add_features(names.into_iter().filter_map(time_domain::by_name));
//!
//!     let mut pre = SignalPreprocessor::new();
//!     pre.add_task(Windower::new(5000, 50, 40));
//!     pre.add_task(filter);
//!     pre.add_task(extractor);
//!     pre.setup_tasks()?;
//!
//!     let emg = Array2::<f64>::zeros((8, 5000)).into_dyn();
//!     let features = pre.process_tasks(emg)?;
//!     assert_eq!(features.shape(), &[8, 496, 4]);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod processing;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigLoader, PreprocessConfig};
pub use error::{PreprocessError, PreprocessResult, ProcessingStage};
pub use processing::{
    Feature, PreprocessTask, ShapePolicy, SignalFilter, SignalPreprocessor, TdExtractor, Windower,
};
