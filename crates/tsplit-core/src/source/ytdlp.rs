//! Media provider backed by the yt-dlp command-line tool.
//!
//! Shells out with `-J` and maps the JSON dump onto the provider model.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::provider::{MediaProvider, MediaVariant, RemoteMedia, VariantKind};

pub struct YtDlpProvider {
    program: PathBuf,
}

impl YtDlpProvider {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for YtDlpProvider {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[derive(Debug, Deserialize)]
struct DumpInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    formats: Vec<DumpFormat>,
}

#[derive(Debug, Deserialize)]
struct DumpFormat {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    tbr: Option<f64>,
    #[serde(default)]
    filesize: Option<u64>,
}

impl MediaProvider for YtDlpProvider {
    fn probe(&self, spec: &str) -> Result<RemoteMedia> {
        let output = Command::new(&self.program)
            .args(["--no-warnings", "-J", spec])
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("no error output")
                .trim()
                .to_string();
            anyhow::bail!("{} {}: {}", self.program.display(), output.status, reason);
        }

        let info: DumpInfo =
            serde_json::from_slice(&output.stdout).context("unparseable media metadata dump")?;
        Ok(map_media(info))
    }
}

fn map_media(info: DumpInfo) -> RemoteMedia {
    let title = info
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "untitled".to_string());
    let variants = info.formats.into_iter().filter_map(map_variant).collect();
    RemoteMedia { title, variants }
}

fn map_variant(format: DumpFormat) -> Option<MediaVariant> {
    let url = format.url?;
    let kind = match (codec_present(&format.vcodec), codec_present(&format.acodec)) {
        (true, true) => VariantKind::Muxed,
        (true, false) => VariantKind::Video,
        (false, true) => VariantKind::Audio,
        (false, false) => return None,
    };
    // filesize_approx is only an estimate; the variant length must be exact.
    let content_length = format.filesize;
    let container = format
        .ext
        .filter(|e| !e.is_empty())
        .or_else(|| container_from_url(&url))
        .unwrap_or_else(|| "bin".to_string());
    Some(MediaVariant {
        container,
        url,
        content_length,
        kind,
        bitrate: format.tbr,
    })
}

// yt-dlp reports absent codecs as the literal string "none".
fn codec_present(codec: &Option<String>) -> bool {
    matches!(codec.as_deref(), Some(c) if !c.is_empty() && c != "none")
}

/// Last-resort container hint taken from the URL path extension.
fn container_from_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let last = parsed.path_segments()?.last()?.to_string();
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "title": "My Mix",
        "formats": [
            {"format_id": "139", "url": "https://cdn.example.com/a.m4a",
             "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.5",
             "tbr": 48.6, "filesize": 1048576},
            {"format_id": "137", "url": "https://cdn.example.com/v.mp4",
             "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none",
             "tbr": 4400.0, "filesize_approx": 9000000.4},
            {"format_id": "18", "url": "https://cdn.example.com/m.mp4",
             "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2",
             "tbr": 500.0},
            {"format_id": "sb0", "url": "https://cdn.example.com/storyboard",
             "ext": "mhtml", "vcodec": "none", "acodec": "none"},
            {"format_id": "broken", "ext": "mp4", "vcodec": "avc1", "acodec": "none"}
        ]
    }"#;

    #[test]
    fn maps_the_dump_onto_variants() {
        let info: DumpInfo = serde_json::from_str(SAMPLE).unwrap();
        let media = map_media(info);
        assert_eq!(media.title, "My Mix");
        // The storyboard (no codecs) and the url-less entry are dropped.
        assert_eq!(media.variants.len(), 3);

        let audio = &media.variants[0];
        assert_eq!(audio.kind, VariantKind::Audio);
        assert_eq!(audio.container, "m4a");
        assert_eq!(audio.content_length, Some(1048576));
        assert_eq!(audio.bitrate, Some(48.6));

        let video = &media.variants[1];
        assert_eq!(video.kind, VariantKind::Video);
        // The dump carries only filesize_approx for this one, which never
        // counts as an exact length.
        assert_eq!(video.content_length, None);

        let muxed = &media.variants[2];
        assert_eq!(muxed.kind, VariantKind::Muxed);
        assert_eq!(muxed.content_length, None);
    }

    #[test]
    fn missing_title_falls_back() {
        let info: DumpInfo = serde_json::from_str(r#"{"formats": []}"#).unwrap();
        let media = map_media(info);
        assert_eq!(media.title, "untitled");
        assert!(media.variants.is_empty());
    }

    #[test]
    fn container_falls_back_to_the_url_extension() {
        let format = DumpFormat {
            url: Some("https://cdn.example.com/path/clip.webm?sig=abc".to_string()),
            ext: None,
            vcodec: None,
            acodec: Some("opus".to_string()),
            tbr: None,
            filesize: None,
        };
        let variant = map_variant(format).unwrap();
        assert_eq!(variant.container, "webm");

        assert_eq!(
            container_from_url("https://cdn.example.com/no-extension"),
            None
        );
        assert_eq!(container_from_url("not a url"), None);
    }

    #[test]
    fn codec_detection_treats_none_as_absent() {
        assert!(!codec_present(&Some("none".to_string())));
        assert!(!codec_present(&Some(String::new())));
        assert!(!codec_present(&None));
        assert!(codec_present(&Some("opus".to_string())));
    }
}
