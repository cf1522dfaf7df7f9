use std::time::Duration;
use std::{fs, path::PathBuf};

use common::retry::RetryPolicy;
use common::session::{FileSessionStore, PollPolicy};
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "registry-admin";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const SESSION_DIR_NAME: &str = "session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the registry admin API
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Base URL package documents are fetched from (defaults to `api_url`)
    #[serde(default)]
    pub registry_url: Option<Url>,
    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Per-request timeout; none by default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

pub const DEFAULT_API_URL: &str = "http://localhost:5000/";

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("hardcoded URL must parse")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            registry_url: None,
            log_level: default_log_level(),
            request_timeout_secs: None,
            login: LoginConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Polling of the login completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub poll_initial_ms: u64,
    pub poll_max_ms: u64,
    pub poll_multiplier: f64,
    pub timeout_secs: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            poll_initial_ms: 1000,
            poll_max_ms: 10_000,
            poll_multiplier: 2.0,
            timeout_secs: 300,
        }
    }
}

impl LoginConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial: Duration::from_millis(self.poll_initial_ms),
            max_interval: Duration::from_millis(self.poll_max_ms),
            multiplier: self.poll_multiplier,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Automatic retries of the package index load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_secs: 5,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::automatic(self.attempts, Duration::from_secs(self.delay_secs))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the state directory (~/.registry-admin)
    pub state_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Directory holding the session token and pending login ticket
    pub session_dir: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.registry-admin)
    pub fn state_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    fn at(state_dir: PathBuf, config: AppConfig) -> Self {
        Self {
            config_path: state_dir.join(CONFIG_FILE_NAME),
            session_dir: state_dir.join(SESSION_DIR_NAME),
            state_dir,
            config,
        }
    }

    /// Initialize a new state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;
        let state = Self::at(state_dir, config.unwrap_or_default());

        if state.config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&state.session_dir)?;
        fs::write(&state.config_path, toml::to_string_pretty(&state.config)?)?;

        Ok(state)
    }

    /// Load existing state from the state directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;
        let config_path = state_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;
        Ok(Self::at(state_dir, config))
    }

    /// Load state, falling back to built-in defaults when nothing was initialized.
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Err(StateError::NotInitialized) => {
                let state_dir = Self::state_dir(custom_path)?;
                tracing::debug!(dir = %state_dir.display(), "no config found, using defaults");
                Ok(Self::at(state_dir, AppConfig::default()))
            }
            other => other,
        }
    }

    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(&self.session_dir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("registry-admin directory not initialized. Run 'registry-admin init' first")]
    NotInitialized,

    #[error("registry-admin directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
