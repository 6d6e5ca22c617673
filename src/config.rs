use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyzer::AnalyzerSettings;
use crate::cli::{
    Cli, DEFAULT_MAX_CRAWL_PAGES, DEFAULT_OUTPUT, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::http_client::HttpClientOptions;
use crate::remote_crawl::{Credentials, RemoteCrawlSettings};

pub const LOGIN_ENV: &str = "DATAFORSEO_LOGIN";
pub const PASSWORD_ENV: &str = "DATAFORSEO_PASSWORD";

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Fetch and probe timeout in seconds
    pub timeout: Option<u64>,

    /// Skip the remote on-page crawl
    pub no_remote: Option<bool>,

    /// Pages the remote crawl may visit
    pub max_crawl_pages: Option<u32>,

    /// Execute JavaScript during the remote crawl
    pub enable_javascript: Option<bool>,

    /// Seconds between remote task status checks
    pub poll_interval: Option<u64>,

    /// Seconds to wait for the remote task
    pub poll_timeout: Option<u64>,

    /// Address for the HTTP API
    pub serve: Option<String>,

    /// Base URL of the remote on-page API
    pub remote_base_url: Option<String>,

    pub remote_login: Option<String>,

    pub remote_password: Option<String>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

const FORMATS: [ConfigFormat; 3] = [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml];

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Candidate config files, current directory first, then the user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &FORMATS {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("sitegrade.{}", ext)));
            }
        }

        // XDG_CONFIG_HOME wins over ~/.config when set and non-empty
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_dir = config_home.join("sitegrade");
            for format in &FORMATS {
                for ext in format.extensions() {
                    paths.push(app_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads `--config` when given, otherwise the first default path that exists.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            url: cli.url.clone(),
            output: if cli.output != DEFAULT_OUTPUT {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
            timeout: if cli.timeout != DEFAULT_TIMEOUT_SECS {
                cli.timeout
            } else {
                self.timeout.unwrap_or(cli.timeout)
            },
            no_remote: cli.no_remote || self.no_remote.unwrap_or(false),
            max_crawl_pages: if cli.max_crawl_pages != DEFAULT_MAX_CRAWL_PAGES {
                cli.max_crawl_pages
            } else {
                self.max_crawl_pages.unwrap_or(cli.max_crawl_pages)
            },
            enable_javascript: if !cli.enable_javascript {
                cli.enable_javascript
            } else {
                self.enable_javascript.unwrap_or(cli.enable_javascript)
            },
            poll_interval: if cli.poll_interval != DEFAULT_POLL_INTERVAL_SECS {
                cli.poll_interval
            } else {
                self.poll_interval.unwrap_or(cli.poll_interval)
            },
            poll_timeout: if cli.poll_timeout != DEFAULT_POLL_TIMEOUT_SECS {
                cli.poll_timeout
            } else {
                self.poll_timeout.unwrap_or(cli.poll_timeout)
            },
            serve: cli.serve.clone().or_else(|| self.serve.clone()),
            config: cli.config.clone(),
        }
    }

    /// Environment credentials replace the file ones only when both are set.
    pub fn credentials(&self) -> Option<Credentials> {
        let from_env = std::env::var(LOGIN_ENV)
            .ok()
            .zip(std::env::var(PASSWORD_ENV).ok());
        let from_file = self.remote_login.clone().zip(self.remote_password.clone());

        from_env
            .filter(|(login, password)| !login.is_empty() && !password.is_empty())
            .or(from_file)
            .map(|(login, password)| Credentials { login, password })
    }

    /// Builds the analyzer settings from merged CLI values.
    pub fn analyzer_settings(&self, cli: &Cli) -> AnalyzerSettings {
        let http = HttpClientOptions {
            timeout: Duration::from_secs(cli.timeout),
            ..Default::default()
        };

        let remote = (!cli.no_remote).then(|| {
            let defaults = RemoteCrawlSettings::default();
            RemoteCrawlSettings {
                base_url: self.remote_base_url.clone().unwrap_or(defaults.base_url),
                credentials: self.credentials(),
                max_crawl_pages: cli.max_crawl_pages.clamp(1, 5),
                enable_javascript: cli.enable_javascript,
                poll_interval: Duration::from_secs(cli.poll_interval),
                poll_timeout: Duration::from_secs(cli.poll_timeout),
                ..defaults
            }
        });

        AnalyzerSettings { http, remote }
    }
}
