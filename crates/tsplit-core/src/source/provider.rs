//! Provider interface for resolving remote media specs.
//!
//! The acquirer only depends on this trait and does not know which tool
//! actually talks to the remote site.

/// Quality preference for picking a format variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Highest,
    Lowest,
    HighestAudio,
    LowestAudio,
    HighestVideo,
    LowestVideo,
}

impl Quality {
    /// Parses the command-line spelling of a quality hint.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "highest" => Some(Self::Highest),
            "lowest" => Some(Self::Lowest),
            "highestaudio" => Some(Self::HighestAudio),
            "lowestaudio" => Some(Self::LowestAudio),
            "highestvideo" => Some(Self::HighestVideo),
            "lowestvideo" => Some(Self::LowestVideo),
            _ => None,
        }
    }
}

/// What a variant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Audio,
    Video,
    Muxed,
}

/// One downloadable rendition of a remote resource.
#[derive(Debug, Clone)]
pub struct MediaVariant {
    /// Container/extension hint, e.g. "m4a" or "webm".
    pub container: String,
    /// Direct content URL.
    pub url: String,
    /// Exact remote size in bytes, when the provider knows one. This length
    /// drives cache validation and the transfer-length check, so estimates
    /// never belong here.
    pub content_length: Option<u64>,
    pub kind: VariantKind,
    /// Average bitrate, used for quality ranking.
    pub bitrate: Option<f64>,
}

/// Remote metadata: a human-readable title plus the available variants.
#[derive(Debug, Clone)]
pub struct RemoteMedia {
    pub title: String,
    pub variants: Vec<MediaVariant>,
}

/// Trait implemented by remote-media resolvers.
///
/// `probe` blocks; call it from `spawn_blocking` when used from async code.
pub trait MediaProvider: Send + Sync {
    fn probe(&self, spec: &str) -> anyhow::Result<RemoteMedia>;
}

/// Picks the variant matching the audio toggle and quality hint.
/// Variants without a known bitrate rank at zero.
pub fn choose_variant(
    variants: &[MediaVariant],
    audio_only: bool,
    quality: Quality,
) -> Option<&MediaVariant> {
    let wants_audio = audio_only || matches!(quality, Quality::HighestAudio | Quality::LowestAudio);
    let wants_video = matches!(quality, Quality::HighestVideo | Quality::LowestVideo);

    let candidates = variants.iter().filter(|v| {
        if wants_audio {
            v.kind == VariantKind::Audio
        } else if wants_video {
            matches!(v.kind, VariantKind::Video | VariantKind::Muxed)
        } else {
            true
        }
    });

    let rank = |v: &MediaVariant| v.bitrate.unwrap_or(0.0);
    match quality {
        Quality::Lowest | Quality::LowestAudio | Quality::LowestVideo => {
            candidates.min_by(|a, b| rank(a).total_cmp(&rank(b)))
        }
        _ => candidates.max_by(|a, b| rank(a).total_cmp(&rank(b))),
    }
}
