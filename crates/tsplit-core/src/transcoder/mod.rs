//! External transcoder integration.
//!
//! Locates the binary, builds the per-section argument list, and runs one
//! transcode process per section.

mod args;
mod invoke;
mod locate;

pub use args::{section_args, TranscodeOptions};
pub use invoke::run_section;
pub use locate::locate_transcoder;
