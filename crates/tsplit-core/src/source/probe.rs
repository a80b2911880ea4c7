//! Lightweight HEAD probe used for cache validation.

use std::str;
use std::time::Duration;

use anyhow::{Context, Result};

/// Fetches the remote `Content-Length` with a HEAD request, following
/// redirects. Returns `None` when the server does not advertise a length.
/// Runs in the current thread; call from `spawn_blocking` in async code.
pub fn remote_content_length(url: &str) -> Result<Option<u64>> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(30))?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform().context("HEAD request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if code < 200 || code >= 300 {
        anyhow::bail!("HEAD {} returned HTTP {}", url, code);
    }

    Ok(parse_content_length(&headers))
}

// Redirect chains emit several header blocks; the final one wins.
fn parse_content_length(lines: &[String]) -> Option<u64> {
    let mut length = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.trim().parse::<u64>() {
                    length = Some(n);
                }
            }
        }
    }
    length
}
