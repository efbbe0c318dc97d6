use std::{env, fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_DOMAIN: &str = "http://localhost:8080";
pub const DEFAULT_STORE_DIR: &str = "../store";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_THUMBNAIL_WORKERS: usize = 8;

pub const ENV_API_DOMAIN: &str = "PROTUBE_API_DOMAIN";
pub const ENV_MEDIA_DOMAIN: &str = "PROTUBE_MEDIA_DOMAIN";
pub const ENV_STORE_DIR: &str = "PROTUBE_STORE_DIR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_domain: String,
    pub media_domain: String,
    pub store_dir: String,
    pub request_timeout_secs: u64,
    pub thumbnail_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_domain: DEFAULT_DOMAIN.to_string(),
            media_domain: DEFAULT_DOMAIN.to_string(),
            store_dir: DEFAULT_STORE_DIR.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            thumbnail_workers: DEFAULT_THUMBNAIL_WORKERS,
        }
    }
}

impl AppConfig {
    /// `{api_domain}/api`
    pub fn api_base_url(&self) -> String {
        format!("{}/api", self.api_domain)
    }

    /// `{media_domain}/media`
    pub fn media_base_url(&self) -> String {
        format!("{}/media", self.media_domain)
    }

    pub fn video_path(&self, id: i64) -> String {
        format!("{}/{id}.mp4", self.store_dir)
    }

    pub fn poster_path(&self, id: i64) -> String {
        format!("{}/{id}.webp", self.store_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_domain: Option<String>,
    media_domain: Option<String>,
    store_dir: Option<String>,
    request_timeout_secs: Option<u64>,
    thumbnail_workers: Option<usize>,
}

/// Defaults, then `config.json` in the working directory, then `PROTUBE_*` env vars.
pub fn load_config() -> AppConfig {
    load_config_from(Path::new(CONFIG_FILE), |key| env::var(key).ok())
}

pub fn load_config_from<F>(path: &Path, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = AppConfig::default();

    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(domain) = parsed.api_domain.as_deref().and_then(normalize_domain) {
                    cfg.api_domain = domain;
                }
                if let Some(domain) = parsed.media_domain.as_deref().and_then(normalize_domain) {
                    cfg.media_domain = domain;
                }
                if let Some(dir) = parsed.store_dir.as_deref().and_then(normalize_domain) {
                    cfg.store_dir = dir;
                }
                if let Some(secs) = parsed.request_timeout_secs {
                    cfg.request_timeout_secs = secs.max(1);
                }
                if let Some(n) = parsed.thumbnail_workers {
                    cfg.thumbnail_workers = n.clamp(1, 32);
                }
                info!("Loaded config from {}", path.display());
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", path.display(), err);
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", path.display());
        }
    }

    if let Some(domain) = lookup(ENV_API_DOMAIN).as_deref().and_then(normalize_domain) {
        cfg.api_domain = domain;
    }
    if let Some(domain) = lookup(ENV_MEDIA_DOMAIN).as_deref().and_then(normalize_domain) {
        cfg.media_domain = domain;
    }
    if let Some(dir) = lookup(ENV_STORE_DIR).as_deref().and_then(normalize_domain) {
        cfg.store_dir = dir;
    }

    cfg
}

/// Empty values count as unset; trailing slashes are dropped so joins stay clean.
fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
