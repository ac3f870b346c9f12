//! Accumulated engine output for the most recent job.

use crate::state::{JobId, JobState, SupervisorEvent};

/// Merged output of the latest job, cleared whenever a new job starts.
///
/// Kept so that a failed job's output can be shown as diagnostic context.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    job: Option<JobId>,
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the transcript from a supervisor event.
    pub fn record(&mut self, event: &SupervisorEvent) {
        match event {
            SupervisorEvent::StateChanged { job, state: JobState::Starting } => {
                self.job = Some(*job);
                self.text.clear();
            }
            SupervisorEvent::Output { job, text, .. } if self.job == Some(*job) => {
                self.text.push_str(text);
            }
            _ => {}
        }
    }

    pub fn job(&self) -> Option<JobId> {
        self.job
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last `n` lines of output.
    pub fn tail(&self, n: usize) -> Vec<&str> {
        let lines: Vec<&str> = self.text.lines().collect();
        lines[lines.len().saturating_sub(n)..].to_vec()
    }
}
