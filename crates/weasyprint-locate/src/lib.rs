//! # weasyprint-locate
//!
//! Find the [WeasyPrint](https://weasyprint.org/) executable so that callers
//! can drive it as an HTML + CSS → PDF engine without hard-coding a path.
//!
//! ## How it works
//!
//! On first call to [`locate_weasyprint`]:
//!
//! 1. If `WEASYPRINT_PATH` is set and points to an executable file, use it.
//! 2. Otherwise search every directory on `PATH` for the platform executable
//!    name (`weasyprint`, or `weasyprint.exe` / `weasyprint.cmd` on Windows).
//!
//! The result is cached for the lifetime of the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use weasyprint_locate::{locate_weasyprint, weasyprint_version};
//!
//! let exe = locate_weasyprint().expect("WeasyPrint not installed");
//! println!("using {} ({})", exe.display(), weasyprint_version(&exe).unwrap_or_default());
//! ```
//!
//! ## Environment variable overrides
//!
//! - `WEASYPRINT_PATH` — explicit path to the executable; skips the `PATH` search.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable holding an explicit executable path.
pub const WEASYPRINT_PATH_ENV: &str = "WEASYPRINT_PATH";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by weasyprint-locate operations.
#[derive(Error, Debug)]
pub enum LocateError {
    /// `WEASYPRINT_PATH` is set but does not name an executable file.
    #[error("WEASYPRINT_PATH is set to '{path}', which is not an executable file")]
    BadOverride { path: PathBuf },

    /// No executable was found on `PATH`.
    #[error(
        "WeasyPrint executable not found on PATH.\n\
         Install it (e.g. `pip install weasyprint`) or set WEASYPRINT_PATH=/path/to/weasyprint."
    )]
    NotFound,

    /// The executable exists but `--version` could not be run.
    #[error("Failed to run '{path}': {reason}")]
    Probe { path: PathBuf, reason: String },
}

// ── Internal: platform metadata ──────────────────────────────────────────────

fn executable_names() -> &'static [&'static str] {
    if cfg!(windows) {
        &["weasyprint.exe", "weasyprint.cmd", "weasyprint.bat"]
    } else {
        &["weasyprint"]
    }
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns `true` if a WeasyPrint executable can be found right now.
pub fn is_weasyprint_available() -> bool {
    locate_weasyprint().is_ok()
}

/// Resolve the WeasyPrint executable path.
///
/// - If `WEASYPRINT_PATH` is set, that path must be an executable file.
/// - Otherwise the first match on `PATH` wins.
///
/// Successful lookups are cached; failures are not, so installing WeasyPrint
/// while a long-running process is alive is picked up on the next call.
pub fn locate_weasyprint() -> Result<PathBuf, LocateError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = resolve(
        std::env::var_os(WEASYPRINT_PATH_ENV).as_deref(),
        std::env::var_os("PATH").as_deref(),
    )?;

    let _ = RESOLVED_PATH.set(path.clone());
    Ok(path)
}

/// Resolve from explicit override / search-path values, bypassing the cache.
pub fn resolve(
    override_path: Option<&OsStr>,
    search_path: Option<&OsStr>,
) -> Result<PathBuf, LocateError> {
    if let Some(raw) = override_path.filter(|p| !p.is_empty()) {
        let p = PathBuf::from(raw);
        if is_executable(&p) {
            return Ok(p);
        }
        return Err(LocateError::BadOverride { path: p });
    }

    search_path
        .and_then(find_in_path)
        .ok_or(LocateError::NotFound)
}

/// Search each directory of a `PATH`-style value for the WeasyPrint executable.
pub fn find_in_path(search_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| executable_names().iter().map(move |name| dir.join(name)))
        .find(|candidate| is_executable(candidate))
}

/// Run `<exe> --version` and return its trimmed output.
pub fn weasyprint_version(exe: &Path) -> Result<String, LocateError> {
    let output = Command::new(exe)
        .arg("--version")
        .output()
        .map_err(|e| LocateError::Probe {
            path: exe.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(LocateError::Probe {
            path: exe.to_path_buf(),
            reason: format!("exited with {}", output.status),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

// ── Internal helpers ─────────────────────────────────────────────────────────

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn fake_executable(dir: &Path) -> PathBuf {
        let path = dir.join(executable_names()[0]);
        std::fs::write(&path, "#!/bin/sh\necho 'WeasyPrint version 62.3'\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn finds_executable_on_search_path() {
        let empty = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let exe = fake_executable(bin.path());

        let search: OsString =
            std::env::join_paths([empty.path(), bin.path()]).unwrap();
        assert_eq!(find_in_path(&search), Some(exe));
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let empty = tempfile::tempdir().unwrap();
        let search: OsString = std::env::join_paths([empty.path()]).unwrap();
        assert!(matches!(
            resolve(None, Some(search.as_os_str())),
            Err(LocateError::NotFound)
        ));
        assert!(matches!(resolve(None, None), Err(LocateError::NotFound)));
    }

    #[test]
    fn override_wins_over_search_path() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let on_path = fake_executable(a.path());
        let explicit = fake_executable(b.path());

        let search: OsString = std::env::join_paths([a.path()]).unwrap();
        let got = resolve(Some(explicit.as_os_str()), Some(search.as_os_str())).unwrap();
        assert_eq!(got, explicit);
        assert_ne!(got, on_path);
    }

    #[test]
    fn bad_override_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("nope");
        let err = resolve(Some(bogus.as_os_str()), None).unwrap_err();
        assert!(matches!(err, LocateError::BadOverride { .. }));
        assert!(err.to_string().contains(WEASYPRINT_PATH_ENV));
    }

    #[test]
    fn empty_override_falls_back_to_search() {
        let bin = tempfile::tempdir().unwrap();
        let exe = fake_executable(bin.path());
        let search: OsString = std::env::join_paths([bin.path()]).unwrap();
        assert_eq!(resolve(Some(OsStr::new("")), Some(search.as_os_str())).unwrap(), exe);
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_ignored() {
        let bin = tempfile::tempdir().unwrap();
        std::fs::write(bin.path().join("weasyprint"), "not a program").unwrap();
        let search: OsString = std::env::join_paths([bin.path()]).unwrap();
        assert_eq!(find_in_path(&search), None);
    }
}
