//! Bounded-concurrency dispatch of planned sections.

mod run;

pub use run::dispatch_plan;
