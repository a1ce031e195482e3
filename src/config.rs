// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::engine::LayoutMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stream: StreamDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDefaults {
    /// Directory holding the playlist
    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,

    /// RTMP ingest host the stream key is appended to
    #[serde(default = "default_rtmp_host")]
    pub rtmp_host: String,

    /// Encoder binary to invoke
    #[serde(default = "default_encoder")]
    pub encoder: String,

    /// Seconds to wait before re-scanning an empty playlist
    #[serde(default = "default_empty_backoff_secs")]
    pub empty_backoff_secs: u64,

    /// Default output layout
    #[serde(default)]
    pub layout: LayoutMode,

    /// Extra encoder arguments, shell-style quoted
    #[serde(default)]
    pub extra_args: String,
}

fn default_video_dir() -> PathBuf {
    PathBuf::from("videos")
}

fn default_rtmp_host() -> String {
    crate::engine::DEFAULT_RTMP_HOST.to_string()
}

fn default_encoder() -> String {
    "ffmpeg".to_string()
}

fn default_empty_backoff_secs() -> u64 {
    5
}

impl Default for StreamDefaults {
    fn default() -> Self {
        Self {
            video_dir: default_video_dir(),
            rtmp_host: default_rtmp_host(),
            encoder: default_encoder(),
            empty_backoff_secs: default_empty_backoff_secs(),
            layout: LayoutMode::Standard,
            extra_args: String::new(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("loopcast")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("loopcast")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or fall back to defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            let config: Config = toml::from_str(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?;

            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }
}
