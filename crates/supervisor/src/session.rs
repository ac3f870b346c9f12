//! Caller-facing facade tying configuration, lookup and supervision together.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::info;
use readify_core::{
    ExecutableLocator, JobConfiguration, build_command, config::ENGINE_SCRIPT_FLAG,
};
use tokio::sync::mpsc;

use crate::{
    error::SessionError,
    state::{JobId, JobOutcome, JobState, SupervisorEvent},
    supervisor::Supervisor,
};

/// How the engine is invoked around the generated argument vector.
///
/// With a script set, the engine runs as `<engine> -script <script> <args...>`;
/// otherwise the arguments are passed directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineInvocation {
    pub script: Option<PathBuf>,
}

impl EngineInvocation {
    pub fn with_script(script: impl Into<PathBuf>) -> Self {
        Self { script: Some(script.into()) }
    }

    /// Full argument list passed to the engine process.
    pub fn argv(&self, args: Vec<OsString>) -> Vec<OsString> {
        match &self.script {
            Some(script) => {
                let mut argv = Vec::with_capacity(args.len() + 2);
                argv.push(ENGINE_SCRIPT_FLAG.into());
                argv.push(script.into());
                argv.extend(args);
                argv
            }
            None => args,
        }
    }
}

/// One user session: a job configuration edited over time, a cached engine
/// path, and the supervisor running generation jobs.
pub struct Session {
    config: JobConfiguration,
    locator: ExecutableLocator,
    invocation: EngineInvocation,
    supervisor: Supervisor,
}

impl Session {
    /// Session searching `PATH` for the default engine, on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SupervisorEvent>) {
        let (supervisor, events) = Supervisor::new();
        (Self::with_parts(ExecutableLocator::default(), supervisor), events)
    }

    pub fn with_parts(locator: ExecutableLocator, supervisor: Supervisor) -> Self {
        Self {
            config: JobConfiguration::new(),
            locator,
            invocation: EngineInvocation::default(),
            supervisor,
        }
    }

    pub fn config(&self) -> &JobConfiguration {
        &self.config
    }

    /// Mutable access for configuration-change events.
    pub fn config_mut(&mut self) -> &mut JobConfiguration {
        &mut self.config
    }

    pub fn invocation(&self) -> &EngineInvocation {
        &self.invocation
    }

    pub fn set_invocation(&mut self, invocation: EngineInvocation) {
        self.invocation = invocation;
    }

    /// Use `path` as the engine from now on, e.g. after a `NotFound` lookup.
    pub fn supply_executable(&mut self, path: impl Into<PathBuf>) {
        let handle = self.locator.supply(path);
        self.config.set_executable_path(handle.into_path());
    }

    /// Resolve the engine without starting anything, so a missing engine can
    /// be reported before the user finishes configuring.
    pub fn locate_engine(&mut self) -> Result<PathBuf, SessionError> {
        let previous = self.config.executable_path().map(Path::to_path_buf);
        let handle = self.locator.resolve(previous.as_deref())?;
        self.config.set_executable_path(handle.path());
        Ok(handle.into_path())
    }

    /// The full engine argument list for the current configuration.
    pub fn command_line(&self) -> Result<Vec<OsString>, SessionError> {
        Ok(self.invocation.argv(build_command(&self.config)?))
    }

    /// Validate the configuration and start a generation job.
    ///
    /// Re-checks the family name, and refuses files still waiting for a
    /// manual style assignment even though the argument builder would skip them.
    pub fn request_generation(&mut self) -> Result<JobId, SessionError> {
        self.config.validate()?;
        let argv = self.command_line()?;
        let engine = self.locate_engine()?;
        info!("Generating {:?} into {:?}", self.config.family_name(), self.config.output_dir());
        Ok(self.supervisor.start(engine, argv)?)
    }

    pub fn state(&self) -> JobState {
        self.supervisor.state()
    }

    pub fn is_active(&self) -> bool {
        self.supervisor.is_active()
    }

    pub fn cancel(&self) -> Result<(), SessionError> {
        Ok(self.supervisor.cancel()?)
    }

    pub async fn join(&self) -> Option<JobOutcome> {
        self.supervisor.join().await
    }

    /// Stop any running job and release the engine process.
    pub async fn dispose(self) {
        self.supervisor.dispose().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_without_script() {
        let args: Vec<OsString> = vec!["MyFont".into(), "--hint-keep".into()];
        assert_eq!(EngineInvocation::default().argv(args.clone()), args);
    }

    #[test]
    fn test_argv_with_script() {
        let invocation = EngineInvocation::with_script("/opt/readify/ReadifyFontCLI.py");
        let argv = invocation.argv(vec!["MyFont".into()]);
        let expected: Vec<OsString> =
            vec!["-script".into(), "/opt/readify/ReadifyFontCLI.py".into(), "MyFont".into()];
        assert_eq!(argv, expected);
    }
}
