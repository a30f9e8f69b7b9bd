// src/config/constants.rs
//! Preprocessing defaults

/// Filter design defaults
pub mod filtering {
    /// Butterworth order used when none is given
    pub const DEFAULT_FILTER_ORDER: usize = 5;
    /// Notch quality factor used when none is given
    pub const DEFAULT_NOTCH_Q: f64 = 30.0;
}

/// Time-domain feature defaults
pub mod features {
    /// Amplitude step counted by the `wamp_5` feature
    pub const DEFAULT_WAMP_THRESHOLD: f64 = 5.0;
}

/// Configuration loading
pub mod loading {
    /// Prefix of environment variables overriding file values
    pub const ENV_PREFIX: &str = "EMG_PREPROCESS";
    /// Separator between nested keys in environment variable names
    pub const ENV_SEPARATOR: &str = "__";
}
