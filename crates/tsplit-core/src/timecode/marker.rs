//! Scanning template lines for bracketed time markers.

use super::{parse_timecode, Timecode};

/// A validated time marker found in a template line.
#[derive(Debug, Clone)]
pub struct TimeMarker {
    /// Byte range of the bracketed token within the line.
    pub span: (usize, usize),
    /// Start timestamp; for a range marker, the left side.
    pub start: Timecode,
    /// End timestamp when the marker is a `[start - end]` range.
    pub end: Option<Timecode>,
}

impl TimeMarker {
    /// Removes the marker span from its line and trims the remainder.
    pub fn strip_from(&self, line: &str) -> String {
        let (lo, hi) = self.span;
        let mut rest = String::with_capacity(line.len());
        rest.push_str(&line[..lo]);
        rest.push_str(&line[hi..]);
        rest.trim().to_string()
    }
}

/// Finds the last valid time marker in a line.
///
/// A marker is `[` timestamp `]`, or `[` timestamp `-` timestamp `]` with
/// whitespace required on both sides of the `-`. Bracketed text that does
/// not parse as a timestamp (`[Song - tag]`, `[9.9.9]`) is not a marker
/// and stays part of the track name.
pub fn extract_marker(line: &str) -> Option<TimeMarker> {
    let bytes = line.as_bytes();
    let mut found = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            if let Some((after, marker)) = match_marker_at(line, i) {
                found = Some(marker);
                i = after;
                continue;
            }
        }
        i += 1;
    }
    found
}

/// Attempts to match a marker whose `[` sits at byte offset `open`.
/// Returns the offset past the closing bracket and the parsed marker.
fn match_marker_at(line: &str, open: usize) -> Option<(usize, TimeMarker)> {
    let bytes = line.as_bytes();
    let body_start = open + 1;
    let first_end = scan_clock_run(bytes, body_start)?;

    // Single form: `[timestamp]`.
    if bytes.get(first_end) == Some(&b']') {
        let start = parse_timecode(&line[body_start..first_end])?;
        let marker = TimeMarker {
            span: (open, first_end + 1),
            start,
            end: None,
        };
        return Some((first_end + 1, marker));
    }

    // Range form: blanks, `-`, blanks, second timestamp, `]`.
    let dash_at = skip_blanks(bytes, first_end);
    if dash_at == first_end || bytes.get(dash_at) != Some(&b'-') {
        return None;
    }
    let second_start = skip_blanks(bytes, dash_at + 1);
    if second_start == dash_at + 1 {
        return None;
    }
    let second_end = scan_clock_run(bytes, second_start)?;
    if bytes.get(second_end) != Some(&b']') {
        return None;
    }

    let start = parse_timecode(&line[body_start..first_end])?;
    let end = parse_timecode(&line[second_start..second_end])?;
    let marker = TimeMarker {
        span: (open, second_end + 1),
        start,
        end: Some(end),
    };
    Some((second_end + 1, marker))
}

/// Advances over `[0-9.:]` bytes; None when the run is empty.
fn scan_clock_run(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b':' || bytes[i] == b'.') {
        i += 1;
    }
    (i > from).then_some(i)
}

fn skip_blanks(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_marker_with_name() {
        let marker = extract_marker("[01:30] bar").unwrap();
        assert_eq!(marker.start.text(), "01:30");
        assert!(marker.end.is_none());
        assert_eq!(marker.strip_from("[01:30] bar"), "bar");
    }

    #[test]
    fn range_marker_yields_both_bounds() {
        let line = "[05:52.1 - 07:24] Qux - abc";
        let marker = extract_marker(line).unwrap();
        assert_eq!(marker.start.text(), "05:52.1");
        assert_eq!(marker.end.as_ref().unwrap().text(), "07:24");
        assert_eq!(marker.strip_from(line), "Qux - abc");
    }

    #[test]
    fn range_marker_accepts_tabs_around_dash() {
        let marker = extract_marker("[01:00\t-\t02:00] x").unwrap();
        assert!(marker.end.is_some());
    }

    #[test]
    fn dash_without_whitespace_is_not_a_range() {
        assert!(extract_marker("[05:52.1-07:24] x").is_none());
        assert!(extract_marker("[05:52.1 -07:24] x").is_none());
        assert!(extract_marker("[05:52.1- 07:24] x").is_none());
    }

    #[test]
    fn last_valid_marker_wins() {
        let line = "x [01:00] y [02:00] z";
        let marker = extract_marker(line).unwrap();
        assert_eq!(marker.start.text(), "02:00");
        assert_eq!(marker.strip_from(line), "x [01:00] y  z");
    }

    #[test]
    fn invalid_bracketed_tokens_stay_in_the_name() {
        let line = "[07:50] -[Song - tag][name]";
        let marker = extract_marker(line).unwrap();
        assert_eq!(marker.start.text(), "07:50");
        assert_eq!(marker.strip_from(line), "-[Song - tag][name]");
    }

    #[test]
    fn invalid_token_after_valid_marker_is_ignored() {
        let line = "a [01:00] b [9.9.9]";
        let marker = extract_marker(line).unwrap();
        assert_eq!(marker.start.text(), "01:00");
        assert_eq!(marker.strip_from(line), "a  b [9.9.9]");
    }

    #[test]
    fn no_marker_in_plain_text() {
        assert!(extract_marker("just a line").is_none());
        assert!(extract_marker("[00:AB.!] FOO").is_none());
        assert!(extract_marker("").is_none());
        assert!(extract_marker("[]").is_none());
    }

    #[test]
    fn marker_nested_after_unclosed_bracket() {
        let line = "[x [01:00] y";
        let marker = extract_marker(line).unwrap();
        assert_eq!(marker.start.text(), "01:00");
        assert_eq!(marker.strip_from(line), "[x  y");
    }
}
