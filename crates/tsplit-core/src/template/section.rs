//! Section and metadata types for the split plan.

use crate::timecode::Timecode;

/// Insertion-ordered metadata pairs, passed to the transcoder as repeated
/// `-metadata key=value` arguments.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Copies `pairs` in the given order.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            entries: pairs.to_vec(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`, overriding an existing entry in place.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Sets `key` only when absent; an existing value wins.
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        if self.get(key).is_none() {
            self.entries.push((key.to_string(), value.into()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One planned output track.
#[derive(Debug, Clone)]
pub struct Section {
    /// The template line with its time marker removed and trimmed. May
    /// legitimately contain bracket characters.
    pub track_name: String,
    /// Sanitized `track_name` plus the output extension.
    pub output_name: String,
    /// Where this track starts in the source.
    pub start: Timecode,
    /// Where it ends; None means "to the end of the source".
    pub end: Option<Timecode>,
    /// 1-based position in the time-sorted plan, doubling as the default
    /// track-number metadata.
    pub index: usize,
    /// Transcoder metadata for this track.
    pub metadata: Metadata,
}
