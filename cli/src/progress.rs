use crate::ui;
use std::time::{Duration, Instant};

/// Step-by-step progress reporting for a sweep
pub struct ProgressTracker {
    operation_name: String,
    start_time: Instant,
    steps: Vec<String>,
    current_step: usize,
}

impl ProgressTracker {
    /// Create a new progress tracker with the given operation name
    pub fn new(operation_name: &str) -> Self {
        ui::section_header(operation_name);
        Self {
            operation_name: operation_name.to_string(),
            start_time: Instant::now(),
            steps: Vec::new(),
            current_step: 0,
        }
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Start the next step
    pub fn start_step(&self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::status_message(step);
        }
    }

    /// Complete the current step
    pub fn complete_step(&mut self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::success_message(step);
            self.current_step += 1;
        }
    }

    /// Mark the current step as failed
    pub fn fail_step(&self, reason: &str) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::error_message(&format!("{step} failed: {reason}"));
        }
    }

    /// Complete the operation
    pub fn complete(&self) {
        ui::success_message(&format!(
            "{} completed in {}",
            self.operation_name,
            format_duration(self.start_time.elapsed())
        ));
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }
}

/// Format a duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 60 {
        format!("{seconds} seconds")
    } else if seconds < 3600 {
        format!(
            "{} minutes {seconds_remainder} seconds",
            seconds / 60,
            seconds_remainder = seconds % 60
        )
    } else {
        format!(
            "{hours} hours {minutes} minutes",
            hours = seconds / 3600,
            minutes = (seconds % 3600) / 60
        )
    }
}
