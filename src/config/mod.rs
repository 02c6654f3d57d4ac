//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `INDUSTRY_PAPERS_` (nested keys joined
//! with `__`, e.g. `INDUSTRY_PAPERS_EUTILS__BASE_URL`).
//!
//! ```toml
//! [eutils]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! database = "pubmed"
//! tool = "industry-papers"
//! email = "me@example.org"
//! timeout_seconds = 60
//!
//! [search]
//! max_results = 20
//!
//! [classification]
//! industry_keywords = ["pharma", "biotech", "inc"]
//! academic_keywords = ["university", "institute"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::AffiliationKeywords;
use crate::models::DEFAULT_MAX_RESULTS;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "INDUSTRY_PAPERS";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "industry-papers.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// NCBI E-utilities endpoint settings
    #[serde(default)]
    pub eutils: EutilsConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Keyword lists used to classify affiliations
    #[serde(default)]
    pub classification: AffiliationKeywords,
}

/// NCBI E-utilities endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EutilsConfig {
    /// Base URL; `esearch.fcgi` and `efetch.fcgi` are appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Entrez database to query
    #[serde(default = "default_database")]
    pub database: String,

    /// Optional `tool` parameter identifying this client to NCBI
    #[serde(default)]
    pub tool: Option<String>,

    /// Optional contact `email` parameter sent to NCBI
    #[serde(default)]
    pub email: Option<String>,

    /// Request timeout; `None` leaves requests unbounded
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            database: default_database(),
            tool: None,
            email: None,
            timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_database() -> String {
    "pubmed".to_string()
}

/// Search defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// PMIDs requested when no count is given on the command line
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], reading overrides from `env` instead of the process
/// environment when it is given
fn load_config_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("classification.industry_keywords")
                .with_list_parse_key("classification.academic_keywords")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.classification = config.classification.normalized();
    Ok(config)
}

/// Find a configuration file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("industry-papers").join("config.toml"))
        .filter(|path| path.is_file())
}
