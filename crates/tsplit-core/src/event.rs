//! Observer interface for split lifecycle events.
//!
//! Callbacks fire from the orchestrating task in a fixed order: source
//! resolution, then the finished plan, then before/after pairs per job.
//! Download callbacks only fire while a remote fetch is actually running.

use std::path::Path;

use crate::template::{Plan, Section};

/// Receives lifecycle notifications during a split run. Every method has an
/// empty default body so implementors pick the events they care about.
pub trait SplitObserver {
    /// A remote input resolved to a local file. `cached` is true when a
    /// previously fetched copy was validated and reused.
    fn on_source_resolved(&mut self, path: &Path, cached: bool) {
        let _ = (path, cached);
    }

    /// Total byte length of an active fetch, when the remote reports one.
    fn on_download_length(&mut self, total: u64) {
        let _ = total;
    }

    /// A chunk of the active fetch arrived. `total` is 0 when unknown.
    /// Delivery is lossy under backpressure; `downloaded` is authoritative.
    fn on_download_progress(&mut self, chunk: u64, downloaded: u64, total: u64) {
        let _ = (chunk, downloaded, total);
    }

    /// The plan is final; dispatch is about to begin.
    fn on_plan_ready(&mut self, plan: &Plan) {
        let _ = plan;
    }

    /// A section is about to be handed to the transcoder. This is the only
    /// point where section metadata may still be amended.
    fn on_before_dispatch(&mut self, section: &mut Section, index: usize) {
        let _ = (section, index);
    }

    /// A section's transcode finished successfully.
    fn on_after_dispatch(&mut self, section: &Section, index: usize) {
        let _ = (section, index);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NullObserver;

impl SplitObserver for NullObserver {}
