//! Error taxonomy for the split pipeline.
//!
//! Planning and acquisition errors abort a run before any dispatch. Job
//! errors are recorded per section and surfaced only after every section
//! has been attempted, with the earliest failure in plan order winning.

use std::path::PathBuf;

/// Failure of a single transcode invocation. Never fatal to sibling jobs.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// The transcoder process could not be launched.
    #[error("failed to launch transcoder: {0}")]
    Spawn(#[from] std::io::Error),

    /// The transcoder ran but exited with a non-zero status.
    #[error("transcoder {status}: {detail}")]
    Exit {
        status: std::process::ExitStatus,
        detail: String,
    },
}

/// Errors a split run can end with.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// A template line carries no valid time marker. The line number always
    /// refers to the original template order, not the sorted plan.
    #[error("no valid time marker in template line {0}")]
    MalformedTemplate(usize),

    #[error("input file {path} does not exist or is not readable")]
    UnreadableInput { path: PathBuf },

    #[error("remote source resolution failed: {reason}")]
    RemoteResolutionFailed { reason: String },

    #[error("no transcoder executable found (install ffmpeg or set an explicit path)")]
    ExecutableNotFound,

    #[error("output path {path} is not a directory")]
    OutputNotDirectory { path: PathBuf },

    #[error("output directory {path} is not writable")]
    OutputNotWritable { path: PathBuf },

    /// One section's transcode failed. `index` is the section's position in
    /// the sorted plan; when several jobs fail, the smallest index wins.
    #[error("job {index} ({output}) failed: {cause}")]
    JobFailed {
        output: String,
        index: usize,
        #[source]
        cause: JobError,
    },

    #[error("cache storage failed: {0}")]
    CacheIo(#[from] std::io::Error),

    #[error("job task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}
