// Configuration Storage Service
// Builds the process-wide AppConfig from defaults, an optional config file and env vars

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HUMANIZE_THRESHOLD: f64 = 30.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 80;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_bind")]
    pub bind_addr: String,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind(),
            cors_origins: default_cors_origins(),
            collaborator: CollaboratorConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CollaboratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Detection scores strictly above this trigger a rewrite in `/analyze`.
    #[serde(default = "default_threshold")]
    pub humanize_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            humanize_threshold: DEFAULT_HUMANIZE_THRESHOLD,
        }
    }
}

fn default_bind() -> String { DEFAULT_BIND_ADDR.to_string() }
fn default_cors_origins() -> Vec<String> { vec![DEFAULT_CORS_ORIGIN.to_string()] }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_base_url() -> String { DEFAULT_GEMINI_URL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_threshold() -> f64 { DEFAULT_HUMANIZE_THRESHOLD }

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub struct ConfigStore {
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_file }
    }

    pub fn from_file(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("multilingual-paraphraser"))
    }

    /// Store pointed to by `PARAPHRASER_CONFIG`, else the platform default.
    pub fn discover() -> Option<Self> {
        match env::var("PARAPHRASER_CONFIG") {
            Ok(p) if !p.trim().is_empty() => Some(Self::from_file(PathBuf::from(p))),
            _ => Self::default_config_dir().map(Self::new),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_file
    }

    /// Load configuration from file; a missing file yields defaults.
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }
}

impl AppConfig {
    /// Defaults, then the config file (if any), then environment variables.
    pub fn load() -> Result<Self, String> {
        let mut config = match ConfigStore::discover() {
            Some(store) => store.load()?,
            None => AppConfig::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from an env-like lookup. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = get("GEMINI_API_KEY") {
            self.collaborator.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.collaborator.model = model;
        }
        if let Some(url) = get("GEMINI_API_URL") {
            self.collaborator.base_url = url;
        }
        if let Some(raw) = get("COLLABORATOR_TIMEOUT_SECS") {
            self.collaborator.timeout_secs = raw
                .parse()
                .map_err(|e| format!("Invalid COLLABORATOR_TIMEOUT_SECS '{}': {}", raw, e))?;
        }
        if let Some(raw) = get("CORS_ORIGINS") {
            self.cors_origins = parse_origins(&raw);
        }
        if let Some(addr) = get("PARAPHRASER_BIND") {
            self.bind_addr = addr;
        }
        if let Some(raw) = get("HUMANIZE_THRESHOLD") {
            let threshold: f64 = raw
                .parse()
                .map_err(|e| format!("Invalid HUMANIZE_THRESHOLD '{}': {}", raw, e))?;
            if !threshold.is_finite() {
                return Err(format!("Invalid HUMANIZE_THRESHOLD '{}'", raw));
            }
            self.analysis.humanize_threshold = threshold;
        }
        Ok(())
    }
}
