// tests/pipeline_tests.rs
//! End-to-end pipeline tests
//!
//! These run random multichannel recordings through windowing, filtering and
//! feature extraction and check the shapes and values that come out.

use emg_preprocess::processing::{
    time_domain, PreprocessTask, ShapePolicy, SignalFilter, SignalPreprocessor, TdExtractor,
    Windower,
};
use ndarray::{Array1, Array2, ArrayD, Axis};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CHANNELS: usize = 8;
const DATA_LEN: usize = 5000;
const FS: f64 = 200.0;

fn random_emg(channels: usize, samples: usize, seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((channels, samples), |_| rng.gen::<f64>()).into_dyn()
}

fn example_filter() -> SignalFilter {
    let mut filter = SignalFilter::new(FS);
    filter.add_default_bandpass(5.0, 95.0).unwrap();
    filter.add_default_notch(50.0).unwrap();
    filter
}

fn extractor(names: &[&str], policy: ShapePolicy) -> TdExtractor {
    let mut fe = TdExtractor::new().with_shape_policy(policy);
    fe.add_features(names.iter().filter_map(|n| time_domain::by_name(n)));
    fe
}

fn pipeline(policy: ShapePolicy, names: &[&str]) -> SignalPreprocessor {
    let mut pre = SignalPreprocessor::new();
    pre.add_tasks(vec![
        Box::new(Windower::new(DATA_LEN, 50, 40).with_shape_policy(policy))
            as Box<dyn PreprocessTask>,
        Box::new(example_filter()),
        Box::new(extractor(names, policy)),
    ]);
    pre.setup_tasks().unwrap();
    pre
}

#[test]
fn test_full_example_pipeline() {
    let pre = pipeline(ShapePolicy::Squeeze, &["mav", "wl", "wamp_5", "ssc"]);
    let res = pre.process_tasks(random_emg(CHANNELS, DATA_LEN, 42)).unwrap();

    assert_eq!(res.shape(), &[CHANNELS, 496, 4]);
    assert!(res.iter().all(|v| v.is_finite()));

    // mav and wl are non-negative, ssc is a count bounded by the window length
    let mav = res.index_axis(Axis(2), 0);
    let ssc = res.index_axis(Axis(2), 3);
    assert!(mav.iter().all(|&v| v >= 0.0));
    assert!(ssc.iter().all(|&v| (0.0..=48.0).contains(&v) && v.fract() == 0.0));
}

#[test]
fn test_single_feature_is_squeezed() {
    let pre = pipeline(ShapePolicy::Squeeze, &["rms"]);
    let res = pre.process_tasks(random_emg(CHANNELS, DATA_LEN, 7)).unwrap();
    assert_eq!(res.shape(), &[CHANNELS, 496]);
}

#[test]
fn test_keep_policy_preserves_rank() {
    let pre = pipeline(ShapePolicy::Keep, &["rms"]);
    let res = pre.process_tasks(random_emg(CHANNELS, DATA_LEN, 7)).unwrap();
    assert_eq!(res.shape(), &[CHANNELS, 496, 1]);
}

#[test]
fn test_single_channel_signal() {
    let pre = pipeline(ShapePolicy::Squeeze, &["mav"]);

    let mut rng = StdRng::seed_from_u64(3);
    let signal = Array1::from_shape_fn(DATA_LEN, |_| rng.gen::<f64>()).into_dyn();
    let res = pre.process_tasks(signal.clone()).unwrap();
    assert_eq!(res.shape(), &[496]);

    // a 1-D signal and a (1, n) signal are the same recording
    let res_2d = pre.process_tasks(signal.insert_axis(Axis(0))).unwrap();
    assert_eq!(res, res_2d);
}

#[test]
fn test_pipeline_is_deterministic() {
    let pre = pipeline(ShapePolicy::Squeeze, &["mav", "zc", "var"]);
    let data = random_emg(4, DATA_LEN, 11);
    assert_eq!(pre.process_tasks(data.clone()).unwrap(), pre.process_tasks(data).unwrap());
}

#[test]
fn test_filtering_removes_offset() {
    // a large DC offset must not survive the 5 Hz highpass edge of the bandpass
    let data = random_emg(2, DATA_LEN, 5);
    let offset = data.mapv(|v| v + 100.0);

    let mut windower = Windower::new(DATA_LEN, 50, 40);
    windower.setup().unwrap();
    let mut filter = example_filter();
    filter.setup().unwrap();

    let filtered = filter.process(windower.process(offset).unwrap()).unwrap();
    let mean = filtered.mean().unwrap();
    assert!(mean.abs() < 1.0, "mean after filtering was {}", mean);
}

proptest! {
    #[test]
    fn prop_window_count_and_step(
        data_len in 1usize..400,
        win_frac in 0.01f64..1.0,
        overlap_frac in 0.0f64..1.0,
        channels in 1usize..4,
    ) {
        let win_len = ((data_len as f64 * win_frac) as usize).max(1);
        let overlap = ((win_len as f64 * overlap_frac) as usize).min(win_len - 1);

        let mut windower =
            Windower::new(data_len, win_len, overlap).with_shape_policy(ShapePolicy::Keep);
        windower.setup().unwrap();

        let step = win_len - overlap;
        prop_assert_eq!(windower.step(), step);
        prop_assert_eq!(windower.window_count(), (data_len - win_len) / step + 1);

        let windows = windower.windows().unwrap();
        prop_assert!(windows.windows(2).all(|pair| pair[1].0 - pair[0].0 == step));
        prop_assert!(windows.iter().all(|&(start, end)| end - start == win_len && end <= data_len));

        let data = Array2::from_shape_fn((channels, data_len), |(c, s)| (c * data_len + s) as f64)
            .into_dyn();
        let out = windower.process(data).unwrap();
        prop_assert_eq!(out.shape(), &[channels, windows.len(), win_len][..]);
        for (w, &(start, _)) in windows.iter().enumerate() {
            prop_assert_eq!(out[[channels - 1, w, 0]], ((channels - 1) * data_len + start) as f64);
        }
    }
}
