use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::poll::PollPolicy;
use crate::resolver::{DocumentUrlResolver, Markers, Strategy};
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Substrings the discovery heuristics look for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Path segment identifying the document viewer route.
    pub viewer_path: String,
    /// Substring every supported page location contains.
    pub site_family: String,
    /// Host whose pages expose the PDF directly in a preconnect hint.
    pub direct_site: String,
    /// Suffix identifying a direct file resource.
    pub direct_suffix: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        let m = Markers::default();
        Self {
            viewer_path: m.viewer_path,
            site_family: "studylib".to_string(),
            direct_site: m.direct_site,
            direct_suffix: m.direct_suffix,
        }
    }
}

/// How long to wait for the viewer's download element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("docgrab/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 300,
        }
    }
}

/// Global configuration loaded from `~/.config/docgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgrabConfig {
    /// Where saved documents go (None = current directory).
    pub download_dir: Option<PathBuf>,
    /// Filename used when a direct resource URL has no usable last segment.
    pub default_filename: String,
    /// Element id activated on the viewer page.
    pub download_element_id: String,
    /// Discovery strategies to run; omitted = all, in priority order.
    pub strategies: Option<Vec<Strategy>>,
    pub markers: MarkerConfig,
    pub poll: PollConfig,
    pub http: HttpConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for DocgrabConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            default_filename: crate::url_model::DEFAULT_DIRECT_FILENAME.to_string(),
            download_element_id: crate::dispatch::DOWNLOAD_ELEMENT_ID.to_string(),
            strategies: None,
            markers: MarkerConfig::default(),
            poll: PollConfig::default(),
            http: HttpConfig::default(),
            retry: None,
        }
    }
}

impl DocgrabConfig {
    pub fn markers(&self) -> Markers {
        Markers {
            viewer_path: self.markers.viewer_path.clone(),
            direct_site: self.markers.direct_site.clone(),
            direct_suffix: self.markers.direct_suffix.clone(),
        }
    }

    /// Resolver over the configured strategy subset, or all of them.
    pub fn resolver(&self) -> DocumentUrlResolver {
        match &self.strategies {
            Some(list) => DocumentUrlResolver::with_strategies(self.markers(), list.iter().copied()),
            None => DocumentUrlResolver::new(self.markers()),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll.interval_ms),
            timeout: Duration::from_millis(self.poll.timeout_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DocgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DocgrabConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: DocgrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
