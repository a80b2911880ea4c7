use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/tsplit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Output container/extension used when no --format flag is given.
    pub default_format: String,
    /// Concurrent transcode processes used when no --concurrency flag is given.
    pub default_concurrency: usize,
    /// Optional override for the fetched-source cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Optional explicit transcoder path, verified instead of searched.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
    /// Optional explicit yt-dlp path.
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            default_format: "mp3".to_string(),
            default_concurrency: 3,
            cache_dir: None,
            ffmpeg_path: None,
            ytdlp_path: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tsplit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SplitConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SplitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SplitConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Directory where fetched sources are cached: the configured override, or
/// `~/.cache/tsplit`.
pub fn cache_dir(cfg: &SplitConfig) -> Result<PathBuf> {
    if let Some(dir) = &cfg.cache_dir {
        return Ok(dir.clone());
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tsplit")?;
    Ok(xdg_dirs.get_cache_home())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SplitConfig::default();
        assert_eq!(cfg.default_format, "mp3");
        assert_eq!(cfg.default_concurrency, 3);
        assert!(cfg.cache_dir.is_none());
        assert!(cfg.ffmpeg_path.is_none());
        assert!(cfg.ytdlp_path.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SplitConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SplitConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.default_format, cfg.default_format);
        assert_eq!(parsed.default_concurrency, cfg.default_concurrency);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            default_format = "m4a"
            default_concurrency = 6
            cache_dir = "/var/cache/tsplit"
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
        "#;
        let cfg: SplitConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.default_format, "m4a");
        assert_eq!(cfg.default_concurrency, 6);
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/var/cache/tsplit")));
        assert_eq!(cfg.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert!(cfg.ytdlp_path.is_none());
    }

    #[test]
    fn cache_dir_override_wins() {
        let cfg = SplitConfig {
            cache_dir: Some(PathBuf::from("/tmp/tsplit-cache")),
            ..SplitConfig::default()
        };
        assert_eq!(cache_dir(&cfg).unwrap(), PathBuf::from("/tmp/tsplit-cache"));
    }
}
