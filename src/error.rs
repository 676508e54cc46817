use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No builds found for {org}/{pipeline}")]
    NoBuilds { org: String, pipeline: String },

    #[error("Invalid project identifier '{0}', expected <org>/<pipeline>")]
    InvalidProject(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Gave up following pagination after {pages} pages of {url}")]
    PaginationLimit { url: String, pages: usize },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No API token found. Set BUILDKITE_TOKEN env var or add token to ~/.config/bkmon/config.toml"
    )]
    MissingToken,

    #[error("No projects configured. Pass them as arguments or add projects to the config file")]
    NoProjects,
}

impl MonitorError {
    /// HTTP status of the failed request, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            MonitorError::Api { status, .. } => Some(*status),
            MonitorError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
