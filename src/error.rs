// src/error.rs
//! Unified error handling for the preprocessing pipeline
//!
//! Every stage reports failures through [`PreprocessError`]. Each variant carries
//! an [`ErrorContext`] naming the component and operation that failed, so an error
//! surfacing from `process_tasks` still says which stage raised it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::time::SystemTime;
use thiserror::Error;

use crate::config::ConfigError;

/// Unified error type for the preprocessing pipeline
#[derive(Debug, Clone, Error)]
pub enum PreprocessError {
    /// Invalid static parameters, raised during configuration or `setup`
    #[error("[CONFIG] Configuration error in {component}: {reason} ({})", .context.operation)]
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },

    /// Input rank not supported by the stage
    #[error(
        "[DIMENSION] {stage} stage expected {expected}, got rank {actual_rank} ({})",
        .context.operation
    )]
    Dimension {
        stage: ProcessingStage,
        expected: String,
        actual_rank: usize,
        context: ErrorContext,
    },

    /// Segment too short for zero-phase filtering
    #[error(
        "[FILTERING] {reason}: signal length {signal_len}, padlen {padlen} ({})",
        .context.operation
    )]
    Filtering {
        reason: String,
        signal_len: usize,
        padlen: usize,
        context: ErrorContext,
    },

    /// Failure while loading a pipeline description
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Pipeline stages for error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStage {
    Windowing,
    Filtering,
    FeatureExtraction,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStage::Windowing => write!(f, "WINDOWING"),
            ProcessingStage::Filtering => write!(f, "FILTERING"),
            ProcessingStage::FeatureExtraction => write!(f, "FEATURE-EXTRACTION"),
        }
    }
}

/// Error context for debugging and analysis
#[derive(Debug, Clone, Serialize)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub component: String,
    pub operation: String,
    /// Source location that raised the error
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
        }
    }

    /// Create error context with file and line information
    pub fn with_location(
        component: &str,
        operation: &str,
        location: &'static Location<'static>,
    ) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(location.file());
        context.line = Some(location.line());
        context
    }
}

/// Result type alias for preprocessing operations
pub type PreprocessResult<T> = Result<T, PreprocessError>;

/// Error builder for convenient error construction
///
/// The builder records the source location it was created at, so every error
/// points at the stage code that raised it.
pub struct PreprocessErrorBuilder {
    component: String,
    operation: String,
    location: &'static Location<'static>,
}

impl PreprocessErrorBuilder {
    #[track_caller]
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            location: Location::caller(),
        }
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::with_location(&self.component, &self.operation, self.location)
    }

    pub fn configuration(self, reason: impl Into<String>) -> PreprocessError {
        let context = self.context();
        PreprocessError::Configuration {
            component: self.component,
            reason: reason.into(),
            context,
        }
    }

    pub fn dimension(
        self,
        stage: ProcessingStage,
        expected: &str,
        actual_rank: usize,
    ) -> PreprocessError {
        PreprocessError::Dimension {
            stage,
            expected: expected.to_string(),
            actual_rank,
            context: self.context(),
        }
    }

    pub fn filtering(
        self,
        reason: impl Into<String>,
        signal_len: usize,
        padlen: usize,
    ) -> PreprocessError {
        PreprocessError::Filtering {
            reason: reason.into(),
            signal_len,
            padlen,
            context: self.context(),
        }
    }
}

impl PreprocessError {
    /// Context of the failing component, if the error carries one
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            PreprocessError::Configuration { context, .. }
            | PreprocessError::Dimension { context, .. }
            | PreprocessError::Filtering { context, .. } => Some(context),
            PreprocessError::Config(_) => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, PreprocessError::Configuration { .. } | PreprocessError::Config(_))
    }

    pub fn is_dimension(&self) -> bool {
        matches!(self, PreprocessError::Dimension { .. })
    }

    pub fn is_filtering(&self) -> bool {
        matches!(self, PreprocessError::Filtering { .. })
    }
}
