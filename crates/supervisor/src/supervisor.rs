//! Engine process supervision.

use std::{
    ffi::OsStr,
    io::{self, ErrorKind},
    path::Path,
    process::{ExitStatus, Stdio},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{debug, info, warn};
use tokio::{
    process::{Child, Command},
    runtime::Handle,
    sync::{mpsc, oneshot, watch},
    time::{Instant, timeout_at},
};

use crate::{
    error::{ProcessError, Result},
    mux::{Multiplexer, OutputChunk},
    state::{FailureReason, JobId, JobOutcome, JobState, SupervisorEvent},
};

/// How long to keep reading output after the engine exits, in case a
/// grandchild still holds the pipes open.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs at most one engine process at a time and reports on it through an
/// event channel.
///
/// `start` returns as soon as the process is launched; output and the final
/// state arrive as [`SupervisorEvent`]s. The child's pipes and process handle
/// never leave the supervisor.
pub struct Supervisor {
    inner: Arc<Mutex<Inner>>,
    events: mpsc::UnboundedSender<SupervisorEvent>,
    runtime: Handle,
}

struct Inner {
    state: JobState,
    last_job: u64,
    /// Present while a job runs and nobody has asked to cancel it.
    cancel: Option<oneshot::Sender<()>>,
    /// Outcome of the most recently finished job, observed by every `join`.
    outcome: watch::Sender<Option<JobOutcome>>,
}

impl Inner {
    fn new() -> Self {
        let (outcome, _) = watch::channel(None);
        Self { state: JobState::Idle, last_job: 0, cancel: None, outcome }
    }

    fn transition(&mut self, events: &mpsc::UnboundedSender<SupervisorEvent>, job: JobId, state: JobState) {
        debug!("Job {job}: {} -> {state}", self.state);
        self.state = state;
        // A dropped receiver only means nobody is listening.
        let _ = events.send(SupervisorEvent::StateChanged { job, state });
    }

    fn finish(&mut self, events: &mpsc::UnboundedSender<SupervisorEvent>, outcome: JobOutcome) {
        self.transition(events, outcome.job, outcome.state);
        self.cancel = None;
        self.outcome.send_replace(Some(outcome.clone()));
        let _ = events.send(SupervisorEvent::Completed(outcome));
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Supervisor {
    /// Create a supervisor on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SupervisorEvent>) {
        Self::with_runtime(Handle::current())
    }

    /// Create a supervisor whose jobs run on `runtime`.
    pub fn with_runtime(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<SupervisorEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let supervisor = Self { inner: Arc::new(Mutex::new(Inner::new())), events, runtime };
        (supervisor, rx)
    }

    pub fn state(&self) -> JobState {
        lock(&self.inner).state
    }

    /// Binary activity flag for progress display.
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Outcome of the most recently finished job.
    pub fn last_outcome(&self) -> Option<JobOutcome> {
        lock(&self.inner).outcome.borrow().clone()
    }

    /// Launch `program` with `args` as a new job.
    ///
    /// Fails with [`ProcessError::ProcessBusy`] while another job is active,
    /// leaving that job untouched. Launch failures move the job to
    /// `Failed(SpawnError)`, emit its `Completed` event, and return
    /// [`ProcessError::ExecutableNotFound`] or [`ProcessError::SpawnError`].
    pub fn start<I, S>(&self, program: impl AsRef<Path>, args: I) -> Result<JobId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let mut inner = lock(&self.inner);
        if inner.state.is_active() {
            return Err(ProcessError::ProcessBusy);
        }

        inner.last_job += 1;
        let job = JobId(inner.last_job);
        inner.transition(&self.events, job, JobState::Starting);

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let _guard = self.runtime.enter();
        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Job {job}: failed to start {}: {e}", program.display());
                let outcome = JobOutcome {
                    job,
                    state: JobState::Failed(FailureReason::SpawnError),
                    exit_code: None,
                };
                inner.finish(&self.events, outcome);
                return Err(match e.kind() {
                    ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                        ProcessError::ExecutableNotFound(program.to_path_buf())
                    }
                    _ => ProcessError::SpawnError(e),
                });
            }
        };

        info!("Job {job}: started {} (pid {})", program.display(), child.id().unwrap_or_default());
        inner.transition(&self.events, job, JobState::Running);

        let (cancel_tx, cancel_rx) = oneshot::channel();
        inner.cancel = Some(cancel_tx);
        self.runtime.spawn(monitor(
            child,
            job,
            cancel_rx,
            Arc::clone(&self.inner),
            self.events.clone(),
        ));
        Ok(job)
    }

    /// Ask the running engine to terminate.
    ///
    /// Returns immediately; the job reports `Failed(Cancelled)` once the
    /// process has actually exited.
    pub fn cancel(&self) -> Result<()> {
        let mut inner = lock(&self.inner);
        if !inner.state.is_active() {
            return Err(ProcessError::NotActive);
        }
        if let Some(cancel) = inner.cancel.take() {
            info!("Job {}: cancelling", inner.last_job);
            let _ = cancel.send(());
        }
        Ok(())
    }

    /// Wait for the current job to finish and return its outcome.
    ///
    /// Any number of callers may wait at once. Returns the last outcome if no
    /// job is in flight, or `None` if no job ever ran.
    pub async fn join(&self) -> Option<JobOutcome> {
        let (mut outcomes, job) = {
            let inner = lock(&self.inner);
            if !inner.state.is_active() {
                return inner.outcome.borrow().clone();
            }
            (inner.outcome.subscribe(), JobId(inner.last_job))
        };
        match outcomes.wait_for(|outcome| outcome.as_ref().is_some_and(|o| o.job == job)).await {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => self.last_outcome(),
        }
    }

    /// Terminate any running engine, wait for it, and release the supervisor.
    pub async fn dispose(self) {
        if self.cancel().is_ok() {
            debug!("Disposing supervisor with an active job");
        }
        self.join().await;
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if let Some(cancel) = lock(&self.inner).cancel.take() {
            let _ = cancel.send(());
        }
    }
}

/// Owns the child for the lifetime of a job: forwards output, waits for
/// exit, handles cancellation, and reports the outcome.
async fn monitor(
    mut child: Child,
    job: JobId,
    mut cancel: oneshot::Receiver<()>,
    inner: Arc<Mutex<Inner>>,
    events: mpsc::UnboundedSender<SupervisorEvent>,
) -> JobOutcome {
    let mut output = Multiplexer::new(child.stdout.take(), child.stderr.take());
    let mut output_open = true;
    let mut cancelled = false;

    let status = loop {
        tokio::select! {
            chunk = output.recv(), if output_open => match chunk {
                Some(chunk) => forward(&events, job, chunk),
                None => output_open = false,
            },
            _ = &mut cancel, if !cancelled => {
                cancelled = true;
                if let Err(e) = child.start_kill() {
                    warn!("Job {job}: failed to signal engine: {e}");
                }
            }
            status = child.wait() => break status,
        }
    };

    let deadline = Instant::now() + OUTPUT_DRAIN_TIMEOUT;
    while output_open {
        match timeout_at(deadline, output.recv()).await {
            Ok(Some(chunk)) => forward(&events, job, chunk),
            Ok(None) => output_open = false,
            Err(_) => {
                warn!("Job {job}: engine output still open after exit, discarding the rest");
                break;
            }
        }
    }
    output.close();
    drop(child);

    conclude(&inner, &events, job, status, cancelled)
}

/// Decide the job's outcome and publish it.
///
/// Runs under the same lock `Supervisor::cancel` takes, so a cancel that
/// returned `Ok` always yields `Failed(Cancelled)`, even if the engine
/// exited on its own before the kill was sent.
fn conclude(
    inner: &Mutex<Inner>,
    events: &mpsc::UnboundedSender<SupervisorEvent>,
    job: JobId,
    status: io::Result<ExitStatus>,
    cancelled: bool,
) -> JobOutcome {
    let mut inner = lock(inner);
    let cancelled = cancelled || inner.cancel.is_none();

    let outcome = match status {
        Ok(status) => {
            let exit_code = exit_code(&status);
            let state = if cancelled {
                JobState::Failed(FailureReason::Cancelled)
            } else if status.success() {
                JobState::Succeeded
            } else {
                JobState::Failed(FailureReason::NonZeroExit(exit_code.unwrap_or(-1)))
            };
            JobOutcome { job, state, exit_code }
        }
        Err(e) => {
            warn!("Job {job}: failed to wait for engine: {e}");
            JobOutcome { job, state: JobState::Failed(FailureReason::SpawnError), exit_code: None }
        }
    };

    info!("Job {job}: {}", outcome.state);
    inner.finish(events, outcome.clone());
    outcome
}

fn forward(events: &mpsc::UnboundedSender<SupervisorEvent>, job: JobId, chunk: OutputChunk) {
    let OutputChunk { stream, text } = chunk;
    let _ = events.send(SupervisorEvent::Output { job, stream, text });
}

fn exit_code(status: &ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        status.code().or_else(|| status.signal().map(|signal| 128 + signal))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}
