//! Locates a runnable transcoder binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const BINARY: &str = "ffmpeg";

// Directories probed when the binary is not on PATH.
const KNOWN_DIRS: &[&str] = &["/usr/local/bin", "/usr/bin", "/opt/homebrew/bin"];

/// Finds the transcoder. An explicit path is only verified, never
/// substituted; otherwise the candidate strategies run in order and the
/// first hit wins.
pub fn locate_transcoder(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return runs_ok(path).then(|| path.to_path_buf());
    }
    let strategies: &[fn() -> Option<PathBuf>] = &[from_path_env, from_known_dirs];
    strategies.iter().find_map(|strategy| strategy())
}

fn from_path_env() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(BINARY))
        .find(|candidate| runs_ok(candidate))
}

fn from_known_dirs() -> Option<PathBuf> {
    KNOWN_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(BINARY))
        .find(|candidate| runs_ok(candidate))
}

// A candidate only counts if it actually executes.
fn runs_ok(candidate: &Path) -> bool {
    Command::new(candidate)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
