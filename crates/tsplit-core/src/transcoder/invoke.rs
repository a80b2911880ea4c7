//! Runs one transcode process for a section.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::JobError;
use crate::template::Section;

use super::args::{section_args, TranscodeOptions};

// How many trailing stderr lines survive into a failure message.
const STDERR_TAIL_LINES: usize = 6;

/// Invokes the transcoder once for `section` and waits for it to exit.
/// A non-zero exit status becomes a job failure carrying the stderr tail.
pub async fn run_section(
    program: &Path,
    input: &Path,
    output_dir: &Path,
    section: &Section,
    options: &TranscodeOptions,
) -> Result<(), JobError> {
    let args = section_args(input, output_dir, section, options);
    tracing::debug!("transcoding {} ({} args)", section.output_name, args.len());

    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if output.status.success() {
        tracing::debug!("transcode finished: {}", section.output_name);
        return Ok(());
    }

    Err(JobError::Exit {
        status: output.status,
        detail: stderr_tail(&output.stderr),
    })
}

fn stderr_tail(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no stderr output".to_string();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
