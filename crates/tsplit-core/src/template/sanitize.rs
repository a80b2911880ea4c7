//! Track-name sanitization for output file names.

const FALLBACK_STEM: &str = "untitled";

// Longest stem kept, in bytes. Most filesystems cap file names at 255.
const MAX_STEM_BYTES: usize = 255;

fn is_reserved(c: char) -> bool {
    matches!(c, '\0' | '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*') || c.is_control()
}

/// Replaces characters that are unsafe in file names with `_`, trims
/// surrounding whitespace and dots, and clips to a filesystem-safe length.
/// An empty result falls back to a fixed stem.
pub fn sanitize_track_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    let clipped = clip_to_boundary(trimmed, MAX_STEM_BYTES);
    if clipped.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        clipped.to_string()
    }
}

/// Builds the output file name for a track: sanitized stem plus extension,
/// clipped so the whole name stays within the filesystem limit.
pub fn output_file_name(track_name: &str, format: &str) -> String {
    let stem = sanitize_track_name(track_name);
    let budget = MAX_STEM_BYTES.saturating_sub(format.len() + 1);
    let stem = clip_to_boundary(&stem, budget);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{}.{}", stem, format)
}

fn clip_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
