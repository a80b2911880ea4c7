//! Streaming GET that lands a fetched source in the cache.
//!
//! Downloads into a `.part` file next to the target and renames it into
//! place only after the transfer completes at the expected length.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc::Sender;

/// Transfer progress sent to the async side during a blocking fetch.
/// Delivery is lossy; a full channel drops updates rather than stalling
/// the transfer.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FetchEvent {
    Length(u64),
    Chunk { bytes: u64, downloaded: u64 },
}

fn part_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    target.with_file_name(name)
}

/// Downloads `url` into `target`, reporting progress through `events`.
/// Returns the number of bytes written.
/// Runs in the current thread; call from `spawn_blocking` in async code.
pub(crate) fn fetch_to_path(
    url: &str,
    target: &Path,
    expected_len: Option<u64>,
    events: Sender<FetchEvent>,
) -> Result<u64> {
    let part_path = part_path_for(target);
    let mut file = File::create(&part_path)
        .with_context(|| format!("cannot create {}", part_path.display()))?;

    if let Some(total) = expected_len {
        let _ = events.try_send(FetchEvent::Length(total));
    }

    let mut downloaded: u64 = 0;
    let mut announced = expected_len.is_some();
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if !announced {
                if let Ok(line) = str::from_utf8(data) {
                    if let Some((name, value)) = line.split_once(':') {
                        if name.trim().eq_ignore_ascii_case("content-length") {
                            if let Ok(total) = value.trim().parse::<u64>() {
                                announced = true;
                                let _ = events.try_send(FetchEvent::Length(total));
                            }
                        }
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                downloaded += data.len() as u64;
                let _ = events.try_send(FetchEvent::Chunk {
                    bytes: data.len() as u64,
                    downloaded,
                });
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("cache write failed: {}", e);
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(err) = write_error {
        let _ = fs::remove_file(&part_path);
        return Err(anyhow::Error::new(err)
            .context(format!("write to {} failed", part_path.display())));
    }
    if let Err(err) = perform_result {
        let _ = fs::remove_file(&part_path);
        return Err(anyhow::Error::new(err).context("GET request failed"));
    }

    let code = easy.response_code().context("no response code")?;
    if code < 200 || code >= 300 {
        let _ = fs::remove_file(&part_path);
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    file.flush()?;
    file.sync_all().context("sync fetched file")?;
    drop(file);

    if let Some(expected) = expected_len {
        if downloaded != expected {
            let _ = fs::remove_file(&part_path);
            anyhow::bail!("partial transfer: wrote {} of {}", downloaded, expected);
        }
    }

    fs::rename(&part_path, target)
        .with_context(|| format!("cannot move {} into place", part_path.display()))?;
    Ok(downloaded)
}
