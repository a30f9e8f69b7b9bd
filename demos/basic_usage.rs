// demos/basic_usage.rs
//! Basic usage example for EMG Preprocess

use emg_preprocess::processing::{
    time_domain, SignalFilter, SignalPreprocessor, TdExtractor, Windower,
};
use emg_preprocess::PreprocessTask;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("EMG Preprocess Basic Usage Example");
    println!("==================================");

    // Simulate an 8 channel signal with 5000 samples
    let mut rng = StdRng::seed_from_u64(42);
    let emg = Array2::from_shape_fn((8, 5000), |_| rng.gen::<f64>());
    println!("Input signal: {} channels x {} samples", emg.nrows(), emg.ncols());

    // Windows of 50 samples, consecutive windows overlapping by 40
    let windower = Windower::new(emg.ncols(), 50, 40);

    // Bandpass and notch filter for a 200 Hz recording
    let mut filter = SignalFilter::new(200.0);
    filter.add_default_bandpass(5.0, 95.0)?;
    filter.add_default_notch(50.0)?;

    // Three vectorised features and one per-window feature
    let mut extractor = TdExtractor::new();
    extractor.add_features(["mav", "wl", "wamp_5"].into_iter().filter_map(time_domain::by_name));
    extractor.add_scalar_feature("ssc", time_domain::ssc);

    let mut pre = SignalPreprocessor::new();
    pre.add_tasks(vec![
        Box::new(windower) as Box<dyn PreprocessTask>,
        Box::new(filter),
        Box::new(extractor),
    ]);
    pre.setup_tasks()?;
    println!("\nPipeline: {:?}", pre.task_names());

    let features = pre.process_tasks(emg.into_dyn())?;
    println!("Feature matrix shape: {:?}", features.shape());

    // First few windows of channel 0
    let channel = features.index_axis(Axis(0), 0);
    for (w, row) in channel.outer_iter().take(5).enumerate() {
        println!("  window {:>3}: {:?}", w, row.iter().copied().collect::<Vec<f64>>());
    }

    Ok(())
}
