use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;

/// Environment variable that overrides `backend` from the config file
pub const BACKEND_ENV: &str = "STUDYLOOP_BACKEND";

/// Which backend implementation the process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// In-memory store, for local/offline use and tests
    #[default]
    Mock,
    /// JSON REST data service
    Remote,
}

impl BackendMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(BackendMode::Mock),
            "remote" => Some(BackendMode::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: "http://localhost:8787/api".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendMode,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default active days per week for a freshly created snapshot
    #[serde(default = "default_weekly_goal_target")]
    pub weekly_goal_target: u8,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
    /// JSON file holding the lesson catalogue
    #[serde(default)]
    pub lessons_path: Option<PathBuf>,
    /// Number of user snapshots kept in the in-process cache
    #[serde(default = "default_snapshot_cache_size")]
    pub snapshot_cache_size: usize,
}

fn default_weekly_goal_target() -> u8 {
    3
}

fn default_recommendation_limit() -> usize {
    3
}

fn default_snapshot_cache_size() -> usize {
    256
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            backend: BackendMode::default(),
            remote: RemoteConfig::default(),
            log_format: LogFormat::default(),
            weekly_goal_target: default_weekly_goal_target(),
            recommendation_limit: default_recommendation_limit(),
            lessons_path: None,
            snapshot_cache_size: default_snapshot_cache_size(),
        }
    }
}

impl AppConfig {
    /// Parse a config document; unknown or missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<AppConfig>(content)
    }

    /// Read and parse a config file, keeping the path in the error chain.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply `STUDYLOOP_BACKEND` when it names a known mode.
    pub fn apply_env_override(mut self, value: Option<&str>) -> Self {
        if let Some(raw) = value {
            match BackendMode::parse(raw) {
                Some(mode) => self.backend = mode,
                None => {
                    tracing::warn!(value = raw, env = BACKEND_ENV, "Ignoring unknown backend override");
                }
            }
        }
        self
    }
}

pub fn app_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support/dev.studyloop");
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push("dev.studyloop");
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share/dev.studyloop");
            return dir;
        }
    }

    PathBuf::from(".")
}

fn get_config_path() -> PathBuf {
    app_data_dir().join("config.toml")
}

fn load_app_config_internal() -> AppConfig {
    let config_path = get_config_path();

    let config = if !config_path.exists() {
        tracing::debug!(path = ?config_path, "No config.toml found, using defaults");
        AppConfig::default()
    } else {
        match AppConfig::from_file(&config_path) {
            Ok(config) => {
                tracing::info!(path = ?config_path, "Loaded app config");
                config
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Invalid config.toml, using defaults");
                AppConfig::default()
            }
        }
    };

    let env_backend = std::env::var(BACKEND_ENV).ok();
    config.apply_env_override(env_backend.as_deref())
}

lazy_static! {
    static ref APP_CONFIG: AppConfig = load_app_config_internal();
}

/// Get the cached app configuration (loaded once per process)
pub fn get_app_config() -> &'static AppConfig {
    &APP_CONFIG
}
