//! Font generation through the engine.

use std::{
    fs::create_dir_all,
    io::{Write, stderr, stdout},
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use readify_supervisor::{
    EngineInvocation, FailureReason, JobOutcome, JobState, Session, SessionError, StreamKind,
    SupervisorEvent, Transcript,
};
use tokio::{signal, sync::mpsc::UnboundedReceiver};

use crate::cli::{EngineArgs, JobArgs};

/// Lines of engine output shown after a failure in quiet mode.
const FAILURE_CONTEXT_LINES: usize = 20;

/// Run the engine for one job, streaming its output until it finishes.
pub async fn generate(job: &JobArgs, engine: &EngineArgs, quiet: bool) -> Result<ExitCode> {
    let (session, events) = Session::new();
    generate_with(session, events, job, engine, quiet).await
}

async fn generate_with(
    mut session: Session,
    mut events: UnboundedReceiver<SupervisorEvent>,
    job: &JobArgs,
    engine: &EngineArgs,
    quiet: bool,
) -> Result<ExitCode> {
    job.apply(session.config_mut())?;
    if let Some(script) = &engine.script {
        session.set_invocation(EngineInvocation::with_script(script));
    }
    if let Some(path) = &engine.engine {
        session.supply_executable(path);
    }

    // Nothing touches the filesystem until the job is known to be runnable.
    session.config().validate()?;
    match session.locate_engine() {
        Ok(path) => debug!("Using engine {}", path.display()),
        Err(SessionError::Locator(e)) => bail!("{e}; use --engine to point at FontForge"),
        Err(e) => return Err(e.into()),
    }
    create_dir_all(&job.out_dir)
        .with_context(|| format!("Failed to create directory: {}", job.out_dir.display()))?;

    let job_id = match session.request_generation() {
        Ok(id) => id,
        Err(SessionError::Locator(e)) => bail!("{e}; use --engine to point at FontForge"),
        Err(e) => return Err(e.into()),
    };
    info!("Job {job_id} started");
    println!("Generating {} into {} ...", job.name, job.out_dir.display());

    let start = Instant::now();
    let mut transcript = Transcript::new();
    let mut cancel_requested = false;
    let outcome = loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    bail!("Engine supervisor stopped without reporting a result");
                };
                transcript.record(&event);
                match event {
                    SupervisorEvent::Output { stream, text, .. } if !quiet => echo(stream, &text),
                    SupervisorEvent::StateChanged { job, state } => debug!("Job {job}: {state}"),
                    SupervisorEvent::Completed(outcome) => break outcome,
                    SupervisorEvent::Output { .. } => {}
                }
            }
            result = signal::ctrl_c(), if !cancel_requested => {
                cancel_requested = true;
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl-C: {e}");
                    continue;
                }
                eprintln!("Cancelling...");
                if let Err(e) = session.cancel() {
                    warn!("{e}");
                }
            }
        }
    };
    session.dispose().await;

    Ok(report(&outcome, &transcript, quiet, start))
}

fn echo(stream: StreamKind, text: &str) {
    // Output is best effort; a closed terminal must not abort the job.
    let _ = match stream {
        StreamKind::Stdout => stdout().write_all(text.as_bytes()),
        StreamKind::Stderr => stderr().write_all(text.as_bytes()),
    };
}

fn report(outcome: &JobOutcome, transcript: &Transcript, quiet: bool, start: Instant) -> ExitCode {
    let elapsed = start.elapsed().as_secs_f64();
    match outcome.state {
        JobState::Succeeded => {
            println!("  ✓ Done ({elapsed:.2}s)");
            return ExitCode::SUCCESS;
        }
        JobState::Failed(FailureReason::Cancelled) => {
            println!("  Cancelled ({elapsed:.2}s)");
            return ExitCode::from(130);
        }
        state => eprintln!("  ✗ Engine {state} ({elapsed:.2}s)"),
    }

    if quiet {
        for line in transcript.tail(FAILURE_CONTEXT_LINES) {
            eprintln!("    {line}");
        }
    }
    match outcome.exit_code {
        Some(code) if (1..=255).contains(&code) => ExitCode::from(code as u8),
        _ => ExitCode::FAILURE,
    }
}
