//! Argument assembly for one transcode invocation.

use std::path::Path;

use crate::template::Section;

/// Pass-through arguments for the transcoder, split by whether they precede
/// the input file or the output path.
#[derive(Debug, Clone, Default)]
pub struct TranscodeOptions {
    pub input_args: Vec<String>,
    pub output_args: Vec<String>,
}

/// Builds the full argument list for one section: fixed flags, input-stage
/// args, the source file, the section's time window, its metadata pairs,
/// output-stage args, then the output path.
pub fn section_args(
    input: &Path,
    output_dir: &Path,
    section: &Section,
    options: &TranscodeOptions,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "repeat+error".to_string(),
        "-y".to_string(),
    ];
    args.extend(options.input_args.iter().cloned());
    args.push("-i".to_string());
    args.push(input.display().to_string());
    args.push("-ss".to_string());
    args.push(section.start.text().to_string());
    if let Some(end) = &section.end {
        args.push("-to".to_string());
        args.push(end.text().to_string());
    }
    for (key, value) in section.metadata.iter() {
        args.push("-metadata".to_string());
        args.push(format!("{}={}", key, value));
    }
    args.extend(options.output_args.iter().cloned());
    args.push(output_dir.join(&section.output_name).display().to_string());
    args
}
