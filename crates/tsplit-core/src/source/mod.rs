//! Source acquisition: local path checks and remote fetch with cache reuse.
//!
//! A URL-like input is resolved through a media provider, cached under a
//! deterministic name derived from the remote title, and only re-fetched
//! when the cached copy no longer matches the remote length.

mod cache;
mod fetch;
mod probe;
mod provider;
mod ytdlp;

pub use cache::{cache_file_name, validate_cached, CacheDecision};
pub use provider::{
    choose_variant, MediaProvider, MediaVariant, Quality, RemoteMedia, VariantKind,
};
pub use ytdlp::YtDlpProvider;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SplitError;
use crate::event::SplitObserver;

use fetch::FetchEvent;

/// Remote-resolution knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcquireOptions {
    pub audio_only: bool,
    pub quality: Quality,
}

/// Resolves `spec` to a readable local file.
///
/// Local paths are only checked for readability. URL-like specs go through
/// the provider: pick a variant, then either reuse the cached copy (when its
/// size matches the remote length) or fetch it fresh. Either way, one
/// `source_resolved` event reports the path and which branch ran.
pub async fn resolve_input(
    spec: &str,
    cache_dir: &Path,
    provider: Arc<dyn MediaProvider>,
    options: &AcquireOptions,
    observer: &mut dyn SplitObserver,
) -> Result<PathBuf, SplitError> {
    if !looks_like_url(spec) {
        let path = PathBuf::from(spec);
        let readable = std::fs::metadata(&path)
            .map(|m| m.is_file())
            .unwrap_or(false)
            && std::fs::File::open(&path).is_ok();
        if !readable {
            return Err(SplitError::UnreadableInput { path });
        }
        return Ok(path);
    }

    let media = {
        let provider = Arc::clone(&provider);
        let spec = spec.to_string();
        tokio::task::spawn_blocking(move || provider.probe(&spec))
            .await?
            .map_err(|err| SplitError::RemoteResolutionFailed {
                reason: format!("{:#}", err),
            })?
    };

    let variant = choose_variant(&media.variants, options.audio_only, options.quality)
        .cloned()
        .ok_or_else(|| SplitError::RemoteResolutionFailed {
            reason: format!("no matching format variant for {}", media.title),
        })?;
    tracing::debug!(
        "chose {} variant for {} ({} candidates)",
        variant.container,
        media.title,
        media.variants.len()
    );

    std::fs::create_dir_all(cache_dir)?;
    let cache_path = cache_dir.join(cache_file_name(&media.title, &variant.container));

    let decision = if cache_path.is_file() {
        let remote_len = match variant.content_length {
            Some(len) => Some(len),
            None => {
                let url = variant.url.clone();
                match tokio::task::spawn_blocking(move || probe::remote_content_length(&url))
                    .await?
                {
                    Ok(len) => len,
                    Err(err) => {
                        tracing::debug!("length probe failed: {:#}", err);
                        None
                    }
                }
            }
        };
        validate_cached(&cache_path, remote_len)
    } else {
        CacheDecision::Refetch
    };

    if decision == CacheDecision::Reuse {
        tracing::info!("reusing cached source: {}", cache_path.display());
        observer.on_source_resolved(&cache_path, true);
        return Ok(cache_path);
    }

    observer.on_source_resolved(&cache_path, false);
    download_variant(&variant, &cache_path, observer).await?;
    Ok(cache_path)
}

async fn download_variant(
    variant: &MediaVariant,
    target: &Path,
    observer: &mut dyn SplitObserver,
) -> Result<(), SplitError> {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<FetchEvent>(64);
    let url = variant.url.clone();
    let expected = variant.content_length;
    let target_path = target.to_path_buf();
    let worker =
        tokio::task::spawn_blocking(move || fetch::fetch_to_path(&url, &target_path, expected, tx));

    let mut total = 0u64;
    while let Some(event) = rx.recv().await {
        match event {
            FetchEvent::Length(len) => {
                total = len;
                observer.on_download_length(len);
            }
            FetchEvent::Chunk { bytes, downloaded } => {
                observer.on_download_progress(bytes, downloaded, total);
            }
        }
    }

    let written = worker
        .await?
        .map_err(|err| SplitError::RemoteResolutionFailed {
            reason: format!("{:#}", err),
        })?;
    tracing::info!("source fetched: {} ({} bytes)", target.display(), written);
    Ok(())
}

/// A spec is remote when it has an explicit scheme, a `www.` prefix, or the
/// shape of a bare host with a plausible TLD and no local file of that name.
pub fn looks_like_url(spec: &str) -> bool {
    let trimmed = spec.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return false;
    }
    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("www.")
    {
        return true;
    }
    bare_host_shape(trimmed) && !Path::new(trimmed).exists()
}

fn bare_host_shape(spec: &str) -> bool {
    if spec.len() < 4 {
        return false;
    }
    let (host, rest) = match spec.split_once('/') {
        Some((h, r)) => (h, Some(r)),
        None => (spec, None),
    };
    let host_char = |c: char| {
        c.is_ascii_alphanumeric()
            || matches!(c, '-' | '@' | ':' | '%' | '.' | '_' | '+' | '~' | '#' | '=')
    };
    if host.is_empty() || !host.chars().all(host_char) {
        return false;
    }
    let Some((name, tld)) = host.rsplit_once('.') else {
        return false;
    };
    if name.is_empty() || !(2..=6).contains(&tld.len()) || !tld.chars().all(|c| c.is_ascii_alphabetic())
    {
        return false;
    }
    match rest {
        None => true,
        Some(r) => r
            .chars()
            .all(|c| host_char(c) || matches!(c, '?' | '&' | '/')),
    }
}
