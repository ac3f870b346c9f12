//! Dry-run output of the engine command line.

use std::ffi::OsStr;

use anyhow::Result;
use log::warn;
use readify_core::{ExecutableLocator, JobConfiguration, build_command, config::ENGINE_PROGRAM};
use readify_supervisor::EngineInvocation;

use crate::cli::{EngineArgs, JobArgs};

/// Print the command that `generate` would run.
pub fn print_command(job: &JobArgs, engine: &EngineArgs) -> Result<()> {
    let mut config = JobConfiguration::new();
    job.apply(&mut config)?;
    let args = build_command(&config)?;

    let invocation = EngineInvocation { script: engine.script.clone() };
    let program = match &engine.engine {
        Some(path) => path.as_os_str().to_owned(),
        None => match ExecutableLocator::default().resolve(None) {
            Ok(handle) => handle.into_path().into_os_string(),
            Err(e) => {
                warn!("{e}");
                ENGINE_PROGRAM.into()
            }
        },
    };

    let line: Vec<String> = std::iter::once(program.as_os_str())
        .chain(invocation.argv(args).iter().map(|a| a.as_os_str()))
        .map(shell_quote)
        .collect();
    println!("{}", line.join(" "));
    Ok(())
}

/// Quote an argument for display in a POSIX shell.
pub fn shell_quote(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    let plain = !arg.is_empty()
        && arg.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain { arg.into_owned() } else { format!("'{}'", arg.replace('\'', r"'\''")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote(OsStr::new("--hint-keep")), "--hint-keep");
        assert_eq!(shell_quote(OsStr::new("/out/dir")), "/out/dir");
        assert_eq!(shell_quote(OsStr::new("My Font")), "'My Font'");
        assert_eq!(shell_quote(OsStr::new("it's")), r"'it'\''s'");
        assert_eq!(shell_quote(OsStr::new("")), "''");
    }
}
