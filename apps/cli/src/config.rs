//! CLI configuration
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `arcadex.toml` in the working directory, or the file passed with `--config`
//! 3. `ARCADEX_*` environment variables (`__` separates nested keys, e.g.
//!    `ARCADEX_LOGGING__LEVEL=debug`; `ARCADEX_COLUMNS=name,year`)
//!
//! Command line flags are applied on top by the caller.

use arcadex_query::SortSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

const DEFAULT_FILE: &str = "arcadex";
const ENV_PREFIX: &str = "ARCADEX";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// SQLite catalog database
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// JSON schema file; the built-in game catalog schema is used when unset
    #[serde(default)]
    pub schema: Option<PathBuf>,

    /// Visible column ids; empty means every filterable column
    #[serde(default)]
    pub columns: Vec<String>,

    /// Sort specs, `column[:asc|:desc]`
    #[serde(default)]
    pub sort: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration. An explicit `file` must exist; the default
    /// `arcadex.toml` is optional.
    pub fn load(file: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let file_source = match file {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_FILE).required(false),
        };

        ::config::Config::builder()
            .add_source(file_source)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("columns")
                    .with_list_parse_key("sort")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.sort_specs()?;
        self.logging
            .level
            .parse::<LevelFilter>()
            .map_err(|_| format!("unknown log level '{}'", self.logging.level))?;
        Ok(())
    }

    pub fn sort_specs(&self) -> Result<Vec<SortSpec>, String> {
        self.sort.iter().map(|s| s.parse::<SortSpec>()).collect()
    }
}
