use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use radiothek_api::types::StreamDescriptor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Search endpoint of the catalog.
    #[serde(default = "default_search_url")]
    pub search_url: String,
}

/// Where the binary audio streams live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_stream_base_url")]
    pub base_url: String,
    #[serde(default = "default_stream_channel")]
    pub channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory shows are saved under.
    /// Defaults to `~/radiothek-shows`.
    #[serde(default = "default_out_base_dir")]
    pub out_base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Poll interval of the progress reporter, in milliseconds.
    #[serde(default = "default_progress_poll_ms")]
    pub progress_poll_ms: u64,
}

impl StreamConfig {
    /// Build the binary-stream URL for a stream descriptor.
    pub fn stream_url(&self, descriptor: &StreamDescriptor) -> String {
        format!(
            "{}?channel={}&id={}",
            self.base_url, self.channel, descriptor.loop_stream_id
        )
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_stream_base_url(),
            channel: default_stream_channel(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            out_base_dir: default_out_base_dir(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            progress_poll_ms: default_progress_poll_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            stream: StreamConfig::default(),
            paths: PathsConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

fn default_search_url() -> String {
    radiothek_api::client::FM4_SEARCH_URL.to_string()
}

fn default_stream_base_url() -> String {
    "https://loopstream01.apa.at/".to_string()
}

fn default_stream_channel() -> String {
    "fm4".to_string()
}

fn default_out_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("radiothek-shows")
}

fn default_progress_poll_ms() -> u64 {
    10_000
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radiothek")
            .join("config.toml")
    }
}
