pub mod config;
pub mod logging;

// Split pipeline modules.
pub mod dispatch;
pub mod error;
pub mod event;
pub mod source;
pub mod splitter;
pub mod template;
pub mod timecode;
pub mod transcoder;
