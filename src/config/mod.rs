use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

// Default configuration values
const DEFAULT_AUTH_URL: &str = "http://localhost:8000/auth";
const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const APP_DIR: &str = "tenant-console";

/// Main configuration struct for the console
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server locations
    #[serde(default)]
    pub api: ApiConfig,
    /// Where the session is kept between runs
    #[serde(default)]
    pub storage: StorageConfig,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the token endpoints (`/login/`, `/refresh/`)
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Session file holding tokens and the cached profile
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// Default functions
fn default_auth_url() -> String {
    std::env::var("TENANT_CONSOLE_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

fn default_api_url() -> String {
    std::env::var("TENANT_CONSOLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

fn default_session_path() -> PathBuf {
    if let Ok(path) = std::env::var("TENANT_CONSOLE_SESSION_PATH") {
        return PathBuf::from(path);
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("session.json"))
        .unwrap_or_else(|| PathBuf::from("session.json"))
}

fn default_timeout() -> u64 {
    std::env::var("TENANT_CONSOLE_HTTP_TIMEOUT")
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            base_url: default_api_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_path: default_session_path(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
        }
    }
}

/// Manages configuration for the application
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<Config>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load from `TENANT_CONSOLE_CONFIG_PATH` or the user config directory
    pub async fn new() -> Result<Self> {
        Self::load(get_config_path()).await
    }

    /// Load from an explicit path, writing the defaults there when missing
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = path.into();
        let config = load_or_create_config(&config_path).await?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a clone of the current configuration
    pub async fn get_config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Replace the configuration and persist it
    pub async fn update_config(&self, new_config: Config) -> Result<()> {
        *self.config.write().await = new_config.clone();
        save_config(&self.config_path, &new_config).await?;
        Ok(())
    }
}

/// Get the path to the configuration file
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("TENANT_CONSOLE_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    if let Some(user_config_dir) = dirs::config_dir() {
        return user_config_dir.join(APP_DIR).join("config.json");
    }

    // Fallback to current directory
    PathBuf::from("config.json")
}

/// Load configuration from file or create default
async fn load_or_create_config(path: &Path) -> Result<Config> {
    if !fs::try_exists(path).await? {
        let default_config = Config::default();
        save_config(path, &default_config).await?;
        info!(path = %path.display(), "Created default configuration");
        return Ok(default_config);
    }

    let config_str = fs::read_to_string(path).await?;
    let config: Config = serde_json::from_str(&config_str)?;
    debug!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

/// Save configuration to file
async fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(path, config_str).await?;
    debug!(path = %path.display(), "Saved configuration");

    Ok(())
}
