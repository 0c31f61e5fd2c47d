//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all Homewire data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
    /// Lead fallback log, JSON lines (`data/lead-fallback.jsonl`).
    pub lead_fallback_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the root if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            llm_config_file: root.join("llm-config.json"),
            lead_fallback_file: root.join("lead-fallback.jsonl"),
            root,
        })
    }
}

/// Upstream endpoint configuration for one external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
}

impl UpstreamConfig {
    /// True when both base URL and key are non-empty.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }
}

/// Top-level Homewire configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomewireConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// IDX/RESO listing feed endpoint.
    pub idx: UpstreamConfig,
    /// BoldTrail/kvCORE CRM endpoint.
    pub crm: UpstreamConfig,
    /// Webhook for new-lead notification dispatch, when configured.
    pub notify_webhook_url: Option<String>,
}

impl HomewireConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3010);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            idx: UpstreamConfig {
                base_url: std::env::var("IDX_BASE_URL").unwrap_or_default(),
                api_key: std::env::var("IDX_API_KEY").unwrap_or_default(),
            },
            crm: UpstreamConfig {
                base_url: std::env::var("CRM_BASE_URL").unwrap_or_default(),
                api_key: std::env::var("CRM_API_KEY").unwrap_or_default(),
            },
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
        })
    }
}
