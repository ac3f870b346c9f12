//! Readify Font supervisor - runs the font editing engine and reports on it.
//!
//! A [`Supervisor`] launches one engine process at a time on a tokio runtime,
//! merges its stdout and stderr into a single feed, and delivers
//! [`SupervisorEvent`]s through an unbounded channel. [`Session`] wraps a
//! supervisor together with the job configuration and executable lookup.

mod error;
mod mux;
mod session;
mod state;
mod supervisor;
mod transcript;

pub use error::{ProcessError, Result, SessionError};
pub use session::{EngineInvocation, Session};
pub use state::{FailureReason, JobId, JobOutcome, JobState, StreamKind, SupervisorEvent};
pub use supervisor::Supervisor;
pub use transcript::Transcript;
