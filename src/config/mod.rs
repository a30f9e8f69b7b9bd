// src/config/mod.rs
//! Declarative pipeline configuration
//!
//! A [`PreprocessConfig`] describes which stages a pipeline has and how each one
//! is parameterised. It is normally read from TOML with [`ConfigLoader`] and
//! turned into a [`SignalPreprocessor`] with [`PreprocessConfig::build`].

pub mod constants;
pub mod loader;

pub use loader::{ConfigError, ConfigLoader};

use serde::Deserialize;

use crate::error::{PreprocessErrorBuilder, PreprocessResult};
use crate::processing::features::time_domain;
use crate::processing::{
    BaCoefficients, ShapePolicy, SignalFilter, SignalPreprocessor, TdExtractor, Windower,
};

const COMPONENT: &str = "config";

/// Complete pipeline description
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreprocessConfig {
    /// Applied to the windowing and feature stages
    #[serde(default)]
    pub shape_policy: ShapePolicy,
    pub windowing: Option<WindowingConfig>,
    pub filtering: Option<FilteringConfig>,
    pub features: Option<FeatureConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowingConfig {
    pub data_len: usize,
    pub win_len: usize,
    #[serde(default)]
    pub overlap: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilteringConfig {
    pub fs: f64,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

/// One filter of the cascade
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterSpec {
    Lowpass {
        cutoff: f64,
        #[serde(default = "defaults::order")]
        order: usize,
    },
    Highpass {
        cutoff: f64,
        #[serde(default = "defaults::order")]
        order: usize,
    },
    Bandpass {
        low: f64,
        high: f64,
        #[serde(default = "defaults::order")]
        order: usize,
    },
    Notch {
        freq: f64,
        #[serde(default = "defaults::notch_q")]
        q: f64,
    },
    Custom {
        b: Vec<f64>,
        a: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureConfig {
    /// Built-in time domain feature names, in output order
    pub names: Vec<String>,
}

mod defaults {
    use crate::config::constants::filtering::{DEFAULT_FILTER_ORDER, DEFAULT_NOTCH_Q};

    pub fn order() -> usize {
        DEFAULT_FILTER_ORDER
    }

    pub fn notch_q() -> f64 {
        DEFAULT_NOTCH_Q
    }
}

impl PreprocessConfig {
    /// Check references that serde cannot, such as feature names
    pub fn validate(&self) -> PreprocessResult<()> {
        if self.windowing.is_none() && self.filtering.is_none() && self.features.is_none() {
            return Err(PreprocessErrorBuilder::new(COMPONENT, "validate")
                .configuration("no stages configured"));
        }
        if let Some(features) = &self.features {
            let unknown = features.names.iter().find(|n| time_domain::by_name(n).is_none());
            if let Some(unknown) = unknown {
                return Err(PreprocessErrorBuilder::new(COMPONENT, "validate").configuration(format!(
                    "unknown feature '{}', expected one of {:?}",
                    unknown,
                    time_domain::FEATURE_NAMES
                )));
            }
        }
        Ok(())
    }

    /// Build a pipeline with stages in windowing, filtering, features order.
    /// The returned pipeline still needs `setup_tasks`.
    pub fn build(&self) -> PreprocessResult<SignalPreprocessor> {
        self.validate()?;
        let mut pre = SignalPreprocessor::new();

        if let Some(w) = &self.windowing {
            let windower = Windower::new(w.data_len, w.win_len, w.overlap);
            pre.add_task(windower.with_shape_policy(self.shape_policy));
        }

        if let Some(f) = &self.filtering {
            let mut filter = SignalFilter::new(f.fs);
            for spec in &f.filters {
                match spec {
                    FilterSpec::Lowpass { cutoff, order } => filter.add_lowpass(*cutoff, *order)?,
                    FilterSpec::Highpass { cutoff, order } => filter.add_highpass(*cutoff, *order)?,
                    FilterSpec::Bandpass { low, high, order } => {
                        filter.add_bandpass(*low, *high, *order)?
                    }
                    FilterSpec::Notch { freq, q } => filter.add_notch(*freq, *q)?,
                    FilterSpec::Custom { b, a } => filter.add_filter(BaCoefficients {
                        b: b.clone(),
                        a: a.clone(),
                    })?,
                }
            }
            pre.add_task(filter);
        }

        if let Some(features) = &self.features {
            let mut extractor = TdExtractor::new().with_shape_policy(self.shape_policy);
            extractor.add_features(features.names.iter().filter_map(|n| time_domain::by_name(n)));
            pre.add_task(extractor);
        }

        Ok(pre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
        [windowing]
        data_len = 5000
        win_len = 50
        overlap = 40

        [filtering]
        fs = 200

        [[filtering.filters]]
        kind = "bandpass"
        low = 5.0
        high = 95.0

        [[filtering.filters]]
        kind = "notch"
        freq = 50.0

        [features]
        names = ["mav", "wl", "wamp_5", "ssc"]
    "#;

    #[test]
    fn test_parse_example() {
        let config: PreprocessConfig = toml::from_str(EXAMPLE).unwrap();
        assert_eq!(config.shape_policy, ShapePolicy::Squeeze);
        assert_eq!(config.windowing.as_ref().unwrap().win_len, 50);

        let filtering = config.filtering.as_ref().unwrap();
        assert_eq!(filtering.fs, 200.0);
        assert_eq!(
            filtering.filters,
            vec![
                FilterSpec::Bandpass { low: 5.0, high: 95.0, order: 5 },
                FilterSpec::Notch { freq: 50.0, q: 30.0 },
            ]
        );
    }

    #[test]
    fn test_build_stage_order() {
        let config: PreprocessConfig = toml::from_str(EXAMPLE).unwrap();
        let pre = config.build().unwrap();
        assert_eq!(pre.task_names(), vec!["windower", "signal_filter", "td_extractor"]);
        assert!(!pre.is_ready());
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let config: PreprocessConfig =
            toml::from_str("[features]\nnames = [\"mav\", \"nope\"]").unwrap();
        assert!(config.build().unwrap_err().is_configuration());
    }

    #[test]
    fn test_empty_config_rejected() {
        let config: PreprocessConfig = toml::from_str("shape_policy = \"keep\"").unwrap();
        assert_eq!(config.shape_policy, ShapePolicy::Keep);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_filter_fails_build() {
        let config: PreprocessConfig = toml::from_str(
            "[filtering]\nfs = 200.0\n[[filtering.filters]]\nkind = \"lowpass\"\ncutoff = 150.0\n",
        )
        .unwrap();
        assert!(config.build().unwrap_err().is_configuration());
    }
}
