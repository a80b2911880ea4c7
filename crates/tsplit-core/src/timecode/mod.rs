//! Clock-style timestamps and their bracketed template marker form.
//!
//! A timestamp is 1 to 3 colon-separated clock components with an optional
//! fractional-second suffix (`45`, `3:28.222`, `01:02:03`). Values compare
//! by total elapsed seconds, never by their literal text.

mod marker;

pub use marker::{extract_marker, TimeMarker};

use std::cmp::Ordering;
use std::fmt;

/// One parsed timestamp: the text as written plus its value in seconds.
#[derive(Debug, Clone)]
pub struct Timecode {
    text: String,
    seconds: f64,
}

impl Timecode {
    /// The timestamp exactly as it appeared in the template.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total elapsed seconds (hours*3600 + minutes*60 + seconds + fraction).
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Timecode {
    fn eq(&self, other: &Self) -> bool {
        self.seconds.total_cmp(&other.seconds) == Ordering::Equal
    }
}

impl Eq for Timecode {}

impl PartialOrd for Timecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timecode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds.total_cmp(&other.seconds)
    }
}

/// Parses a bare timestamp (no brackets).
///
/// Returns None when the text does not fit the clock grammar: 1-3
/// components of 1-2 digits joined by `:`, then an optional `.` plus 1-4
/// fraction digits. The fraction scales by its width (`.1` is 0.1s,
/// `.222` is 0.222s). Components are not range-checked, so `75:00` is a
/// valid 4500 seconds.
pub fn parse_timecode(text: &str) -> Option<Timecode> {
    let (clock, fraction) = match text.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (text, None),
    };

    let mut components = 0usize;
    let mut seconds = 0.0f64;
    for part in clock.split(':') {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        components += 1;
        if components > 3 {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        seconds = seconds * 60.0 + f64::from(value);
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty()
            || fraction.len() > 4
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let digits: u32 = fraction.parse().ok()?;
        seconds += f64::from(digits) / 10f64.powi(fraction.len() as i32);
    }

    Some(Timecode {
        text: text.to_string(),
        seconds,
    })
}
