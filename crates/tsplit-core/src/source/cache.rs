//! Cache naming and reuse validation for fetched sources.

use std::path::Path;

use crate::template::sanitize_track_name;

/// Outcome of checking a cached source against the remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// The local copy matches the remote length; no fetch needed.
    Reuse,
    /// The local copy is missing, stale, or unverifiable.
    Refetch,
}

/// Deterministic cache file name for a remote resource.
pub fn cache_file_name(title: &str, container: &str) -> String {
    format!("{}.{}", sanitize_track_name(title), container)
}

/// Decides whether `path` may stand in for the remote resource.
/// An unknown remote length never validates a reuse.
pub fn validate_cached(path: &Path, remote_len: Option<u64>) -> CacheDecision {
    let Some(remote_len) = remote_len else {
        return CacheDecision::Refetch;
    };
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == remote_len => CacheDecision::Reuse,
        _ => CacheDecision::Refetch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn names_are_sanitized() {
        assert_eq!(cache_file_name("My Mix", "m4a"), "My Mix.m4a");
        assert_eq!(cache_file_name("a/b: c", "webm"), "a_b_ c.webm");
        assert_eq!(cache_file_name("", "mp3"), "untitled.mp3");
    }

    #[test]
    fn matching_size_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cached.m4a");
        fs::write(&path, b"0123456789").unwrap();
        assert_eq!(validate_cached(&path, Some(10)), CacheDecision::Reuse);
    }

    #[test]
    fn size_mismatch_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cached.m4a");
        fs::write(&path, b"short").unwrap();
        assert_eq!(validate_cached(&path, Some(10)), CacheDecision::Refetch);
    }

    #[test]
    fn missing_file_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.m4a");
        assert_eq!(validate_cached(&path, Some(10)), CacheDecision::Refetch);
    }

    #[test]
    fn unknown_remote_length_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cached.m4a");
        fs::write(&path, b"0123456789").unwrap();
        assert_eq!(validate_cached(&path, None), CacheDecision::Refetch);
    }

    #[test]
    fn directory_refetches() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(validate_cached(dir.path(), Some(10)), CacheDecision::Refetch);
    }
}
