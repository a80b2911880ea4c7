//! CLI for the tsplit media splitter.

mod observer;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use tsplit_core::config;
use tsplit_core::source::{MediaProvider, Quality, YtDlpProvider};
use tsplit_core::splitter::{SplitOptions, Splitter};

use observer::TerminalObserver;

/// Top-level CLI for the tsplit media splitter.
#[derive(Debug, Parser)]
#[command(name = "tsplit")]
#[command(
    about = "tsplit: split one media file into tracks from a timestamp template",
    long_about = None
)]
pub struct Cli {
    /// Local file or URL of the source media.
    #[arg(short, long, default_value = "input.mp3")]
    pub input: String,

    /// Template file with one timestamped line per track.
    #[arg(short, long, default_value = "templ.txt")]
    pub template: String,

    /// Directory the output tracks are written to.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Output container/extension (config default when omitted).
    #[arg(short, long)]
    pub format: Option<String>,

    /// Concurrent transcode processes (config default when omitted).
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Global metadata pair applied to every track, repeatable.
    #[arg(short, long, value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,

    /// Template line given inline, repeatable; overrides the template file.
    #[arg(short, long, value_name = "LINE")]
    pub section: Vec<String>,

    /// Prefer audio-only source variants.
    #[arg(short, long)]
    pub audioonly: bool,

    /// Source quality hint: highest, lowest, highestaudio, lowestaudio,
    /// highestvideo or lowestvideo.
    #[arg(short, long, default_value = "highest")]
    pub quality: String,

    /// Extra transcoder argument placed before -i, repeatable.
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    pub input_arg: Vec<String>,

    /// Extra transcoder argument placed before the output path, repeatable.
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    pub output_arg: Vec<String>,

    /// Override the fetched-source cache directory.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Explicit transcoder binary (verified, not searched).
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,
}

pub async fn run_from_args() -> Result<()> {
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let quality = Quality::parse(&cli.quality)
        .with_context(|| format!("unknown quality hint: {}", cli.quality))?;
    let metadata = parse_metadata(&cli.metadata)?;
    let lines = if cli.section.is_empty() {
        read_template_lines(&cli.template)?
    } else {
        cli.section.clone()
    };

    let cache_dir = match cli.cache_dir.clone() {
        Some(dir) => dir,
        None => config::cache_dir(&cfg)?,
    };

    let opts = SplitOptions {
        input: cli.input.clone(),
        lines,
        output_dir: cli.output.clone(),
        format: cli
            .format
            .clone()
            .unwrap_or_else(|| cfg.default_format.clone()),
        concurrency: cli.concurrency.unwrap_or(cfg.default_concurrency),
        metadata,
        audio_only: cli.audioonly,
        quality,
        input_args: cli.input_arg.clone(),
        output_args: cli.output_arg.clone(),
        cache_dir,
        ffmpeg_path: cli.ffmpeg.clone().or_else(|| cfg.ffmpeg_path.clone()),
    };

    let provider: Arc<dyn MediaProvider> = match &cfg.ytdlp_path {
        Some(path) => Arc::new(YtDlpProvider::new(path.clone())),
        None => Arc::new(YtDlpProvider::default()),
    };

    let splitter = Splitter::with_provider(opts, provider);
    let mut observer = TerminalObserver::new();
    let plan = splitter.run(&mut observer).await?;

    if plan.is_empty() {
        println!("No sections in template.");
    } else {
        println!("Done: {} track(s) in {}", plan.len(), cli.output.display());
    }
    Ok(())
}

fn parse_metadata(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|raw| {
            raw.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .with_context(|| format!("invalid metadata entry (want key=value): {}", raw))
        })
        .collect()
}

fn read_template_lines(path: &str) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("unable to open template file {}", path))?;
    let trimmed = data.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(trimmed.lines().map(|l| l.to_string()).collect())
}
