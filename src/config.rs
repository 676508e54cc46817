use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::client::API_ENDPOINT;
use crate::error::{MonitorError, Result};
use crate::monitor::Settings;

const TOKEN_ENV: &str = "BUILDKITE_TOKEN";

const DEFAULT_INTERVAL_SECS: u64 = 60;

#[derive(Deserialize, Serialize, Default, Debug)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| MonitorError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents, config_path)
    }

    fn parse(contents: &str, path: PathBuf) -> Result<Self> {
        toml::from_str(contents).map_err(|e| MonitorError::ConfigParse { path, source: e })
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MonitorError::ConfigWrite {
                path: config_path.clone(),
                source: e,
            })?;
        }

        let contents = toml::to_string(self).map_err(|e| MonitorError::ConfigWrite {
            path: config_path.clone(),
            source: std::io::Error::other(e),
        })?;

        std::fs::write(&config_path, contents).map_err(|e| MonitorError::ConfigWrite {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "bkmon")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(MonitorError::NoConfigDir)
    }

    /// Get API token with env var taking precedence over config file
    pub fn token(&self) -> Result<String> {
        Self::resolve_token(std::env::var(TOKEN_ENV).ok(), self.token.as_deref())
    }

    fn resolve_token(env: Option<String>, configured: Option<&str>) -> Result<String> {
        env.filter(|t| !t.is_empty())
            .or_else(|| configured.filter(|t| !t.is_empty()).map(String::from))
            .ok_or(MonitorError::MissingToken)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(API_ENDPOINT)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval.unwrap_or(DEFAULT_INTERVAL_SECS).max(1)
    }

    /// Build poll settings. Projects given on the command line replace the
    /// configured list.
    pub fn settings(&self, projects: Vec<String>) -> Result<Settings> {
        let projects = if projects.is_empty() {
            self.projects.clone()
        } else {
            projects
        };

        Ok(Settings {
            token: self.token()?,
            projects,
        })
    }
}
