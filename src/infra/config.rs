use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planners::{DEFAULT_MAX_PLAN_LENGTH, SearchSettings};

const DEFAULT_IDLE_DELAY_MS: u64 = 1000;
const DEFAULT_BUSY_DELAY_MS: u64 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
}

fn default_parallel() -> bool {
    true
}

fn default_max_plan_length() -> usize {
    DEFAULT_MAX_PLAN_LENGTH
}

fn default_idle_delay_ms() -> u64 {
    DEFAULT_IDLE_DELAY_MS
}

fn default_busy_delay_ms() -> u64 {
    DEFAULT_BUSY_DELAY_MS
}

/// Server credentials and client tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub url: String,
    pub env: String,
    pub agent: String,
    pub pwd: String,
    #[serde(default)]
    pub single_request: bool,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_max_plan_length")]
    pub max_plan_length: usize,
    #[serde(default)]
    pub replays_folder: Option<String>,
    #[serde(default = "default_idle_delay_ms")]
    pub idle_delay_ms: u64,
    #[serde(default = "default_busy_delay_ms")]
    pub busy_delay_ms: u64,
    #[serde(default)]
    pub max_rounds: Option<u64>,
}

impl Config {
    /// Reads the JSON file at `path` if given, the environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from `WUMPUS_*` variables resolved by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()));

        Ok(Config {
            url: required("WUMPUS_URL")?,
            env: required("WUMPUS_ENV")?,
            agent: required("WUMPUS_AGENT")?,
            pwd: required("WUMPUS_PWD")?,
            single_request: parse_var(&lookup, "WUMPUS_SINGLE_REQUEST")?.unwrap_or(false),
            parallel: parse_var(&lookup, "WUMPUS_PARALLEL")?.unwrap_or_else(default_parallel),
            max_plan_length: parse_var(&lookup, "WUMPUS_MAX_PLAN_LENGTH")?
                .unwrap_or_else(default_max_plan_length),
            replays_folder: lookup("WUMPUS_REPLAYS_FOLDER"),
            idle_delay_ms: parse_var(&lookup, "WUMPUS_IDLE_DELAY_MS")?
                .unwrap_or_else(default_idle_delay_ms),
            busy_delay_ms: parse_var(&lookup, "WUMPUS_BUSY_DELAY_MS")?
                .unwrap_or_else(default_busy_delay_ms),
            max_rounds: parse_var(&lookup, "WUMPUS_MAX_ROUNDS")?,
        })
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            parallel: self.parallel,
            max_plan_length: self.max_plan_length,
        }
    }

    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Endpoint the client polls.
    pub fn act_url(&self) -> String {
        format!("{}/act/{}", self.base_url(), self.env)
    }

    /// Page showing how the agent performs.
    pub fn hint_url(&self) -> String {
        format!("{}/agent/{}/{}", self.base_url(), self.env, self.agent)
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }

    pub fn busy_delay(&self) -> Duration {
        Duration::from_millis(self.busy_delay_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map(Some).map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(None),
    }
}
