use crate::cli::Cli;
use crate::slot::FileSlot;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    path: Option<String>,
    /// Base url of the weather service.
    pub api_url: String,
    /// Where the request history is kept. Defaults to the user data dir.
    pub history_file: Option<PathBuf>,
    /// Timeout for each request to the weather service.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            api_url: DEFAULT_API_URL.to_string(),
            history_file: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the specified path, the default config dir
    /// (~/.config/lazyweather/) or a local .lazyweather.toml.
    pub fn load(path: &Option<String>) -> Self {
        let config_path = if let Some(p) = path {
            PathBuf::from(p)
        } else {
            Self::default_config_dir()
        };
        Self::load_from_path(&config_path)
    }

    fn load_from_path(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(config_path) {
            Ok(content) => {
                let mut config = Self::parse(&content).unwrap_or_else(|e| {
                    warn!("Ignoring invalid config {:?}: {}", config_path, e);
                    Self::default()
                });
                config.path = config_path.to_str().map(|s| s.to_string());
                config
            }
            Err(e) => {
                warn!("Failed to read config {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the path of the configuration file if it was loaded from a file.
    pub fn get_path(&self) -> Option<&String> {
        self.path.as_ref()
    }

    fn default_config_dir() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("lazyweather").join("config.toml");
            if config_path.exists() {
                return config_path;
            }
        }
        // Fallback to local .lazyweather.toml (might not exist)
        PathBuf::from(".lazyweather.toml")
    }

    /// Applies command line overrides.
    pub fn with_overrides(mut self, args: &Cli) -> Self {
        if let Some(api_url) = &args.api_url {
            self.api_url = api_url.clone();
        }
        if let Some(history_file) = &args.history_file {
            self.history_file = Some(history_file.clone());
        }
        self
    }

    /// The history file to use, if any location is available.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(FileSlot::default_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
