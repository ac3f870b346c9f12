//! Job states and the events a supervisor emits.

use std::fmt;

/// Identifier of one engine run, unique per supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a job did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The engine exited with a non-zero status (signal deaths are `128 + signal`).
    NonZeroExit(i32),
    /// The engine could not be launched or waited on.
    SpawnError,
    /// The job was cancelled and the engine has exited.
    Cancelled,
}

/// Lifecycle of the current job: `Idle -> Starting -> Running -> Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Starting,
    Running,
    Succeeded,
    Failed(FailureReason),
}

impl JobState {
    /// Whether an engine process is (being) launched. Callers show this as
    /// indeterminate progress; the engine reports no percentage.
    pub const fn is_active(self) -> bool {
        matches!(self, JobState::Starting | JobState::Running)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed(_))
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Idle => f.write_str("idle"),
            JobState::Starting => f.write_str("starting"),
            JobState::Running => f.write_str("running"),
            JobState::Succeeded => f.write_str("succeeded"),
            JobState::Failed(FailureReason::NonZeroExit(code)) => {
                write!(f, "failed (exit code {code})")
            }
            JobState::Failed(FailureReason::SpawnError) => f.write_str("failed to start"),
            JobState::Failed(FailureReason::Cancelled) => f.write_str("cancelled"),
        }
    }
}

/// Which engine stream a chunk of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// Final result of a job, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job: JobId,
    pub state: JobState,
    /// Exit code, absent when the engine never started.
    pub exit_code: Option<i32>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == JobState::Succeeded
    }
}

/// Notification sent to the supervisor's subscriber.
///
/// Per job: state changes and output in order, then exactly one `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    StateChanged { job: JobId, state: JobState },
    /// Engine output as it arrived; chunks are not aligned to lines.
    Output { job: JobId, stream: StreamKind, text: String },
    Completed(JobOutcome),
}

impl SupervisorEvent {
    pub fn job(&self) -> JobId {
        match self {
            SupervisorEvent::StateChanged { job, .. } | SupervisorEvent::Output { job, .. } => *job,
            SupervisorEvent::Completed(outcome) => outcome.job,
        }
    }
}
