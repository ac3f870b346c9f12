//! End-to-end generation requests against a stand-in engine script.
#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    time::Duration,
};

use readify_core::{ConfigurationError, ExecutableLocator, HintMode, LocatorError};
use readify_supervisor::{
    EngineInvocation, JobState, Session, SessionError, Supervisor, SupervisorEvent, Transcript,
};
use tokio::{sync::mpsc::UnboundedReceiver, time::timeout};

/// Engine stand-in that echoes each argument on its own line.
const ECHO_ENGINE: &str = "#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\"; done\n";

fn write_engine(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, ECHO_ENGINE).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn session_with_search_path(search: &Path) -> (Session, UnboundedReceiver<SupervisorEvent>) {
    let (supervisor, events) = Supervisor::new();
    let locator = ExecutableLocator::with_search_path("readify-engine", search);
    (Session::with_parts(locator, supervisor), events)
}

fn configure(session: &mut Session, out_dir: &Path) {
    let config = session.config_mut();
    config.set_family_name("Readable").unwrap();
    config.load_files(["/fonts/Serif-Regular.ttf", "/fonts/Serif-Bold.ttf"]);
    config.set_hint_mode(HintMode::Remove);
    config.set_darken_enabled(true);
    config.set_darken_amount(8);
    config.set_output_dir(out_dir);
}

async fn transcript_of_next_job(rx: &mut UnboundedReceiver<SupervisorEvent>) -> (Transcript, JobState) {
    let mut transcript = Transcript::new();
    loop {
        let event = timeout(Duration::from_secs(20), rx.recv()).await.unwrap().unwrap();
        transcript.record(&event);
        if let SupervisorEvent::Completed(outcome) = event {
            return (transcript, outcome.state);
        }
    }
}

#[tokio::test]
async fn test_generation_passes_arguments_to_engine() {
    let bin = tempfile::tempdir().unwrap();
    write_engine(bin.path(), "readify-engine");
    let out = tempfile::tempdir().unwrap();

    let (mut session, mut rx) = session_with_search_path(bin.path());
    configure(&mut session, out.path());

    session.request_generation().unwrap();
    let (transcript, state) = transcript_of_next_job(&mut rx).await;
    assert_eq!(state, JobState::Succeeded);

    let out_dir = out.path().to_string_lossy();
    let expected = [
        "Readable",
        "--regular-file",
        "/fonts/Serif-Regular.ttf",
        "--bold-file",
        "/fonts/Serif-Bold.ttf",
        "--hint-remove",
        "--darken",
        "8",
        "--out-dir",
        &*out_dir,
    ];
    assert_eq!(transcript.text().lines().collect::<Vec<_>>(), expected);
    assert!(session.config().executable_path().is_some());

    // A second request reuses the cached engine and output directory.
    session.request_generation().unwrap();
    let (_, state) = transcript_of_next_job(&mut rx).await;
    assert_eq!(state, JobState::Succeeded);

    session.dispose().await;
}

#[tokio::test]
async fn test_engine_script_is_prepended() {
    let bin = tempfile::tempdir().unwrap();
    write_engine(bin.path(), "readify-engine");
    let out = tempfile::tempdir().unwrap();

    let (mut session, mut rx) = session_with_search_path(bin.path());
    configure(&mut session, out.path());
    session.set_invocation(EngineInvocation::with_script("/opt/ReadifyFontCLI.py"));

    session.request_generation().unwrap();
    let (transcript, _) = transcript_of_next_job(&mut rx).await;
    let lines: Vec<&str> = transcript.text().lines().collect();
    assert_eq!(&lines[..3], ["-script", "/opt/ReadifyFontCLI.py", "Readable"]);
}

#[tokio::test]
async fn test_missing_engine_then_supplied_path() {
    let empty = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let engine = write_engine(elsewhere.path(), "my-engine");
    let out = tempfile::tempdir().unwrap();

    let (mut session, mut rx) = session_with_search_path(empty.path());
    configure(&mut session, out.path());

    let err = session.request_generation().unwrap_err();
    assert!(matches!(err, SessionError::Locator(LocatorError::NotFound(_))));
    assert_eq!(session.state(), JobState::Idle);

    session.supply_executable(&engine);
    session.request_generation().unwrap();
    let (_, state) = transcript_of_next_job(&mut rx).await;
    assert_eq!(state, JobState::Succeeded);
}

#[tokio::test]
async fn test_incomplete_configuration_is_refused() {
    let bin = tempfile::tempdir().unwrap();
    write_engine(bin.path(), "readify-engine");
    let (mut session, _rx) = session_with_search_path(bin.path());

    session.config_mut().load_files(["/fonts/Serif-Regular.ttf"]);
    session.config_mut().set_output_dir("/out");
    let err = session.request_generation().unwrap_err();
    assert!(matches!(err, SessionError::ConfigIncomplete(ConfigurationError::EmptyName)));

    session.config_mut().set_family_name("Readable").unwrap();
    session.config_mut().load_files(["/fonts/Serif.ttf"]);
    let err = session.request_generation().unwrap_err();
    assert!(matches!(err, SessionError::ConfigIncomplete(ConfigurationError::NoFilesAssigned)));
    assert_eq!(session.state(), JobState::Idle);
}
