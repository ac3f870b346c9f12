//! Engine executable lookup.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{config::ENGINE_PROGRAM, error::LocatorError};

/// Resolved engine executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableHandle(PathBuf);

impl ExecutableHandle {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ExecutableHandle {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Finds the engine on the executable search path and remembers it for the session.
#[derive(Debug, Clone)]
pub struct ExecutableLocator {
    program: String,
    search_path: Option<OsString>,
    cached: Option<ExecutableHandle>,
}

impl Default for ExecutableLocator {
    fn default() -> Self {
        Self::new(ENGINE_PROGRAM)
    }
}

impl ExecutableLocator {
    /// Locator for `program`, searching the process `PATH`.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), search_path: None, cached: None }
    }

    /// Locator searching an explicit `PATH`-style list instead of the environment.
    pub fn with_search_path(program: impl Into<String>, search_path: impl Into<OsString>) -> Self {
        Self { search_path: Some(search_path.into()), ..Self::new(program) }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn cached(&self) -> Option<&ExecutableHandle> {
        self.cached.as_ref()
    }

    /// Resolve the engine executable.
    ///
    /// A `previous` path (typically supplied by the user after a
    /// [`LocatorError::NotFound`]) is accepted and cached as-is; whether it
    /// runs is only discovered at spawn time. Otherwise the cached handle is
    /// returned, or the search path is scanned.
    pub fn resolve(&mut self, previous: Option<&Path>) -> Result<ExecutableHandle, LocatorError> {
        if let Some(path) = previous {
            return Ok(self.supply(path));
        }
        if let Some(handle) = &self.cached {
            return Ok(handle.clone());
        }

        let search_path = self.search_path.clone().or_else(|| env::var_os("PATH"));
        let found = search_path.and_then(|paths| find_in_path(&self.program, &paths));
        match found {
            Some(path) => {
                info!("Using {} at {}", self.program, path.display());
                let handle = ExecutableHandle(path);
                self.cached = Some(handle.clone());
                Ok(handle)
            }
            None => Err(LocatorError::NotFound(self.program.clone())),
        }
    }

    /// Cache a caller-supplied executable path without checking it.
    pub fn supply(&mut self, path: impl Into<PathBuf>) -> ExecutableHandle {
        let handle = ExecutableHandle(path.into());
        debug!("Engine path set to {}", handle.path().display());
        self.cached = Some(handle.clone());
        handle
    }
}

fn find_in_path(program: &str, search_path: &OsString) -> Option<PathBuf> {
    env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(program).into_iter().map(move |name| dir.join(name)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidates(program: &str) -> Vec<String> {
    let exts = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    let mut names = vec![program.to_string()];
    names.extend(exts.split(';').filter(|e| !e.is_empty()).map(|e| format!("{program}{e}")));
    names
}

#[cfg(not(windows))]
fn candidates(program: &str) -> Vec<String> {
    vec![program.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata().is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use super::*;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_finds_executable_on_search_path() {
        let empty = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let expected = make_file(bin.path(), "fontforge", 0o755);
        let search = env::join_paths([empty.path(), bin.path()]).unwrap();

        let mut locator = ExecutableLocator::with_search_path("fontforge", search);
        assert_eq!(locator.resolve(None).unwrap().path(), expected);
        assert_eq!(locator.cached().map(ExecutableHandle::path), Some(expected.as_path()));
    }

    #[test]
    fn test_skips_non_executable_files() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_file(first.path(), "fontforge", 0o644);
        let expected = make_file(second.path(), "fontforge", 0o700);
        let search = env::join_paths([first.path(), second.path()]).unwrap();

        let mut locator = ExecutableLocator::with_search_path("fontforge", search);
        assert_eq!(locator.resolve(None).unwrap().into_path(), expected);
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator = ExecutableLocator::with_search_path("fontforge", dir.path());
        assert_eq!(locator.resolve(None), Err(LocatorError::NotFound("fontforge".to_string())));
        assert!(locator.cached().is_none());
    }

    #[test]
    fn test_supplied_path_is_cached_without_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator = ExecutableLocator::with_search_path("fontforge", dir.path());
        let supplied = Path::new("/nowhere/fontforge");

        assert_eq!(locator.resolve(Some(supplied)).unwrap().path(), supplied);
        assert_eq!(locator.resolve(None).unwrap().path(), supplied);
    }

    #[test]
    fn test_cache_survives_path_changes() {
        let bin = tempfile::tempdir().unwrap();
        let path = make_file(bin.path(), "fontforge", 0o755);
        let mut locator = ExecutableLocator::with_search_path("fontforge", bin.path());
        locator.resolve(None).unwrap();

        fs::remove_file(&path).unwrap();
        assert_eq!(locator.resolve(None).unwrap().path(), path);
    }
}
