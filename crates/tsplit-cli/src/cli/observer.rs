//! Terminal progress rendering for a split run.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tsplit_core::event::SplitObserver;
use tsplit_core::template::{Plan, Section};

// Minimum gap between progress line repaints.
const PROGRESS_INTERVAL_MS: u128 = 500;

/// Renders run progress as plain lines on stdout.
#[derive(Default)]
pub struct TerminalObserver {
    fetch_started: Option<Instant>,
    last_print: Option<Instant>,
    total_tracks: usize,
    done_tracks: usize,
}

impl TerminalObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SplitObserver for TerminalObserver {
    fn on_source_resolved(&mut self, path: &Path, cached: bool) {
        if cached {
            println!("Found cached source at {}", path.display());
        } else {
            println!("Fetching source to {}", path.display());
            self.fetch_started = Some(Instant::now());
        }
    }

    fn on_download_length(&mut self, total: u64) {
        println!("Download size: {}", friendly_bytes(total));
    }

    fn on_download_progress(&mut self, _chunk: u64, downloaded: u64, total: u64) {
        let finished = total > 0 && downloaded >= total;
        let due = self
            .last_print
            .map(|at| at.elapsed().as_millis() >= PROGRESS_INTERVAL_MS)
            .unwrap_or(true);
        if !due && !finished {
            return;
        }
        self.last_print = Some(Instant::now());

        let elapsed = self
            .fetch_started
            .map(|at| at.elapsed().as_secs_f64())
            .unwrap_or(0.0)
            .max(0.001);
        let rate = friendly_bytes((downloaded as f64 / elapsed) as u64);
        if total > 0 {
            let percent = downloaded as f64 / total as f64 * 100.0;
            print!(
                "\r  {} / {} ({:.1}%)  {}/s   ",
                friendly_bytes(downloaded),
                friendly_bytes(total),
                percent,
                rate
            );
        } else {
            print!("\r  {} downloaded  {}/s   ", friendly_bytes(downloaded), rate);
        }
        let _ = std::io::stdout().flush();
        if finished {
            println!();
        }
    }

    fn on_plan_ready(&mut self, plan: &Plan) {
        self.total_tracks = plan.len();
        if plan.is_empty() {
            return;
        }
        println!("Planned {} track(s):", plan.len());
        for section in plan.iter() {
            let end = section
                .end
                .as_ref()
                .map(|e| e.text().to_string())
                .unwrap_or_else(|| "end".to_string());
            println!(
                "  {}. {} [{} - {}]",
                section.index,
                section.track_name,
                section.start.text(),
                end
            );
        }
    }

    fn on_after_dispatch(&mut self, section: &Section, _index: usize) {
        self.done_tracks += 1;
        println!(
            "[{}/{}] wrote {}",
            self.done_tracks, self.total_tracks, section.output_name
        );
    }
}

fn friendly_bytes(n: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", n, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
