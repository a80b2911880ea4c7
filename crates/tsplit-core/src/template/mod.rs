//! Template parsing: turns timestamped lines into a time-sorted plan of
//! sections, one per output track.

mod sanitize;
mod section;

pub use sanitize::{output_file_name, sanitize_track_name};
pub use section::{Metadata, Section};

use crate::error::SplitError;
use crate::timecode::extract_marker;

/// The finalized, time-sorted sequence of sections. Count and order are
/// fixed after planning; only section metadata may change later, through
/// the before-dispatch observer hook.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    sections: Vec<Section>,
}

impl Plan {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

/// Builds a plan from template lines.
///
/// Each line must carry a time marker. A single-marker line borrows its end
/// from the next line's start; the last line runs to the end of the source.
/// Line numbers in errors always reference the original file order, even
/// though the finished plan is sorted by start time.
pub fn plan_sections(
    lines: &[String],
    format: &str,
    global_metadata: &[(String, String)],
) -> Result<Plan, SplitError> {
    let mut sections = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line_no = i + 1;
        let marker = extract_marker(line).ok_or(SplitError::MalformedTemplate(line_no))?;
        let end = match marker.end.clone() {
            Some(end) => Some(end),
            None => match lines.get(i + 1) {
                Some(next) => {
                    let next_marker =
                        extract_marker(next).ok_or(SplitError::MalformedTemplate(line_no + 1))?;
                    Some(next_marker.start)
                }
                None => None,
            },
        };
        if let Some(end) = &end {
            if *end < marker.start {
                return Err(SplitError::MalformedTemplate(line_no));
            }
        }
        let track_name = marker.strip_from(line);
        let output_name = output_file_name(&track_name, format);
        sections.push(Section {
            track_name,
            output_name,
            start: marker.start,
            end,
            index: 0,
            metadata: Metadata::new(),
        });
    }

    // Stable sort: equal start times keep their original file order.
    sections.sort_by(|a, b| a.start.cmp(&b.start));
    for (pos, section) in sections.iter_mut().enumerate() {
        section.index = pos + 1;
        let mut metadata = Metadata::from_pairs(global_metadata);
        metadata.set_default("title", section.track_name.clone());
        metadata.set_default("track", section.index.to_string());
        section.metadata = metadata;
    }

    Ok(Plan { sections })
}
