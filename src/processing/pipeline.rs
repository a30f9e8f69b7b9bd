// src/processing/pipeline.rs
//! Sequencing manager for preprocessing tasks

use ndarray::ArrayD;
use std::fmt;
use tracing::{debug, info};

use crate::error::{PreprocessErrorBuilder, PreprocessResult};
use crate::processing::task::PreprocessTask;

const COMPONENT: &str = "signal_preprocessor";

/// Ordered list of preprocessing tasks.
///
/// Tasks run in the order they were added. Each task's output is the next
/// task's input. `setup_tasks` must succeed before `process_tasks` is used.
#[derive(Default)]
pub struct SignalPreprocessor {
    tasks: Vec<Box<dyn PreprocessTask>>,
    ready: bool,
}

impl SignalPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single task
    pub fn add_task<T: PreprocessTask + 'static>(&mut self, task: T) {
        self.add_boxed_task(Box::new(task));
    }

    pub fn add_boxed_task(&mut self, task: Box<dyn PreprocessTask>) {
        self.tasks.push(task);
        self.ready = false;
    }

    /// Append tasks, keeping their order
    pub fn add_tasks(&mut self, tasks: impl IntoIterator<Item = Box<dyn PreprocessTask>>) {
        for task in tasks {
            self.add_boxed_task(task);
        }
    }

    /// Set up every task in order. The first failure is returned and the
    /// pipeline stays unusable.
    pub fn setup_tasks(&mut self) -> PreprocessResult<()> {
        self.ready = false;
        for task in &mut self.tasks {
            debug!(task = task.name(), "setting up task");
            task.setup()?;
        }
        self.ready = true;
        info!(tasks = ?self.task_names(), "preprocessing pipeline ready");
        Ok(())
    }

    /// Run `data` through every task in order
    pub fn process_tasks(&self, data: ArrayD<f64>) -> PreprocessResult<ArrayD<f64>> {
        if !self.tasks.is_empty() && !self.ready {
            return Err(PreprocessErrorBuilder::new(COMPONENT, "process_tasks")
                .configuration("setup_tasks must succeed before processing"));
        }

        let mut res = data;
        for task in &self.tasks {
            let input_shape = res.shape().to_vec();
            res = task.process(res)?;
            debug!(
                task = task.name(),
                input = ?input_shape,
                output = ?res.shape(),
                "task processed"
            );
        }
        Ok(res)
    }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

impl fmt::Debug for SignalPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalPreprocessor")
            .field("tasks", &self.task_names())
            .field("ready", &self.ready)
            .finish()
    }
}
