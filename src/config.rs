//! Configuration
//!
//! Loaded from (later sources win):
//! 1. Default values
//! 2. Config file (`qabase.toml` in the working directory, or `--config`)
//! 3. Environment variables (`QABASE_*`)
//! 4. `SPACE_ID`, as set by the hosting space
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::agent::context::{ResolverSettings, DEFAULT_NOT_FOUND_MESSAGE};

pub const DEFAULT_CONFIG_FILE: &str = "qabase.toml";
pub const DEFAULT_API_URL: &str = "https://agents-course-unit4-scoring.hf.space";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite corpus database
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Try the exact-match index before similarity search
    #[serde(default)]
    pub exact_match: bool,

    #[serde(default = "default_not_found_message")]
    pub not_found_message: String,

    /// Base URL of the scoring service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account name reported with submissions
    #[serde(default)]
    pub username: Option<String>,

    /// Hosting space id, used to build the agent code link
    #[serde(default)]
    pub space_id: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".qabase/corpus.db")
}

fn default_not_found_message() -> String {
    DEFAULT_NOT_FOUND_MESSAGE.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            exact_match: false,
            not_found_message: default_not_found_message(),
            api_url: default_api_url(),
            username: None,
            space_id: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load from all sources. A missing config file is not an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::figment(&path).extract()
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("QABASE_"))
            .merge(Env::raw().only(&["SPACE_ID"]))
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            exact_match: self.exact_match,
            not_found_message: self.not_found_message.clone(),
        }
    }

    /// Link to the agent's source, submitted alongside the answers
    pub fn agent_code(&self) -> Option<String> {
        self.space_id
            .as_deref()
            .map(|id| format!("https://huggingface.co/spaces/{}/tree/main", id))
    }
}
