// tests/config_tests.rs
//! Configuration loading tests
//!
//! Environment variables are process-global, so tests touching them are
//! serialised.

use emg_preprocess::config::{ConfigError, ConfigLoader, FilterSpec, PreprocessConfig};
use emg_preprocess::error::{PreprocessError, PreprocessResult};
use ndarray::Array2;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const PIPELINE_TOML: &str = r#"
[windowing]
data_len = 1000
win_len = 50
overlap = 40

[filtering]
fs = 200.0

[[filtering.filters]]
kind = "bandpass"
low = 5.0
high = 95.0

[[filtering.filters]]
kind = "notch"
freq = 50.0
q = 25.0

[features]
names = ["mav", "wl", "wamp_5", "ssc"]
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run_config(
    config: &PreprocessConfig,
    channels: usize,
    samples: usize,
) -> PreprocessResult<Vec<usize>> {
    let mut pre = config.build()?;
    pre.setup_tasks()?;
    let data = Array2::from_shape_fn((channels, samples), |(c, s)| ((c + 1) * s) as f64).into_dyn();
    Ok(pre.process_tasks(data)?.shape().to_vec())
}

#[test]
#[serial]
fn test_load_and_run_pipeline_file() {
    let file = write_config(PIPELINE_TOML);
    let config = ConfigLoader::new().add_path(file.path()).without_environment().load().unwrap();

    let filtering = config.filtering.as_ref().unwrap();
    assert_eq!(filtering.filters.len(), 2);
    assert_eq!(filtering.filters[1], FilterSpec::Notch { freq: 50.0, q: 25.0 });

    assert_eq!(run_config(&config, 4, 1000).unwrap(), vec![4, 96, 4]);
}

#[test]
#[serial]
fn test_later_files_override_earlier() {
    let base = write_config(PIPELINE_TOML);
    let overlay = write_config("[windowing]\noverlap = 0\n");

    let paths: Vec<PathBuf> = vec![base.path().to_path_buf(), overlay.path().to_path_buf()];
    let config = ConfigLoader::with_paths(paths).without_environment().load().unwrap();

    let windowing = config.windowing.as_ref().unwrap();
    assert_eq!((windowing.win_len, windowing.overlap), (50, 0));
    assert_eq!(run_config(&config, 2, 1000).unwrap(), vec![2, 20, 4]);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_config(PIPELINE_TOML);

    std::env::set_var("EMG_PREPROCESS__WINDOWING__OVERLAP", "25");
    let result = ConfigLoader::new().add_path(file.path()).load();
    std::env::remove_var("EMG_PREPROCESS__WINDOWING__OVERLAP");

    let config = result.unwrap();
    assert_eq!(config.windowing.unwrap().overlap, 25);
}

#[test]
#[serial]
fn test_default_loader_applies_environment() {
    let file = write_config(PIPELINE_TOML);

    std::env::set_var("EMG_PREPROCESS__WINDOWING__OVERLAP", "25");
    let from_default = ConfigLoader::default().add_path(file.path()).load();
    let from_new = ConfigLoader::new().add_path(file.path()).load();
    std::env::remove_var("EMG_PREPROCESS__WINDOWING__OVERLAP");

    assert_eq!(from_default.unwrap().windowing.unwrap().overlap, 25);
    assert_eq!(from_new.unwrap().windowing.unwrap().overlap, 25);
}

#[test]
#[serial]
fn test_missing_file_is_reported() {
    let err = ConfigLoader::new().add_path("/definitely/not/here.toml").load().unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(path) if path.contains("here.toml")));
}

#[test]
fn test_config_errors_convert_to_preprocess_errors() {
    fn load(content: &str) -> PreprocessResult<PreprocessConfig> {
        Ok(ConfigLoader::from_toml_str(content)?)
    }

    let err = load("[windowing]\nwin_len = \"fifty\"\n").unwrap_err();
    assert!(matches!(err, PreprocessError::Config(ConfigError::ParseError(_))));
    assert!(err.is_configuration());
}

#[test]
fn test_filter_defaults_and_custom_coefficients() {
    let config = ConfigLoader::from_toml_str(
        r#"
        [filtering]
        fs = 1000.0

        [[filtering.filters]]
        kind = "highpass"
        cutoff = 20.0

        [[filtering.filters]]
        kind = "custom"
        b = [0.5, 0.5]
        a = [1.0]
        "#,
    )
    .unwrap();

    let filters = &config.filtering.as_ref().unwrap().filters;
    assert_eq!(filters[0], FilterSpec::Highpass { cutoff: 20.0, order: 5 });
    assert_eq!(filters[1], FilterSpec::Custom { b: vec![0.5, 0.5], a: vec![1.0] });

    // filtering alone keeps the (channel, sample) shape
    assert_eq!(run_config(&config, 3, 200).unwrap(), vec![3, 200]);
}

#[test]
fn test_unknown_filter_kind_is_rejected() {
    let content = "[filtering]\nfs = 100.0\n[[filtering.filters]]\nkind = \"comb\"\n";
    let err = ConfigLoader::from_toml_str(content).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}
