//! Runtime configuration.
//!
//! Nothing network-related is compiled in: the datasource id, the script
//! endpoint and the sheet names are injected at startup, either directly,
//! from a JSON file, or from environment variables.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Default base of the spreadsheet read API; override for test servers.
const DEFAULT_QUERY_BASE: &str = "https://docs.google.com/spreadsheets/d";

const ENV_SOURCE_ID: &str = "SHEETLINK_SOURCE_ID";
const ENV_SCRIPT_URL: &str = "SHEETLINK_SCRIPT_URL";
const ENV_QUERY_BASE: &str = "SHEETLINK_QUERY_BASE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration value '{name}'")]
    MissingValue { name: &'static str },

    #[error("invalid URL for '{name}': {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("'{name}' must be an http(s) base URL")]
    NotABaseUrl { name: &'static str },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Names of the workbook tabs each page reads.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    /// Working days and holidays
    pub calendar: String,
    /// Login/role lookup rows
    pub master: String,
    /// Unique checklist tasks
    pub checklist: String,
    /// Delegation tasks
    pub delegation: String,
    /// User and department administration
    pub directory: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            calendar: "Working Day Calendar".to_owned(),
            master: "master".to_owned(),
            checklist: "Unique".to_owned(),
            delegation: "Delegation".to_owned(),
            directory: "Whatsapp".to_owned(),
        }
    }
}

/// Validated runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Datasource identifier under the read API base
    pub source_id: String,
    /// Write proxy endpoint
    pub script_url: Url,
    /// Read API base URL
    pub query_base: Url,
    pub sheets: SheetNames,
}

/// On-disk shape of the configuration, before URL validation.
#[derive(Deserialize)]
struct ConfigFile {
    source_id: String,
    script_url: String,
    #[serde(default)]
    query_base: Option<String>,
    #[serde(default)]
    sheets: SheetNames,
}

impl Config {
    pub fn new(source_id: impl Into<String>, script_url: &str) -> Result<Self, ConfigError> {
        Self::build(source_id.into(), script_url, None, SheetNames::default())
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        Self::build(
            file.source_id,
            &file.script_url,
            file.query_base.as_deref(),
            file.sheets,
        )
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads configuration from `SHEETLINK_SOURCE_ID`, `SHEETLINK_SCRIPT_URL`
    /// and optionally `SHEETLINK_QUERY_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source_id = std::env::var(ENV_SOURCE_ID)
            .map_err(|_| ConfigError::MissingValue { name: ENV_SOURCE_ID })?;
        let script_url = std::env::var(ENV_SCRIPT_URL)
            .map_err(|_| ConfigError::MissingValue { name: ENV_SCRIPT_URL })?;
        let query_base = std::env::var(ENV_QUERY_BASE).ok();
        Self::build(source_id, &script_url, query_base.as_deref(), SheetNames::default())
    }

    /// Replaces the default sheet names.
    pub fn with_sheets(mut self, sheets: SheetNames) -> Self {
        self.sheets = sheets;
        self
    }

    fn build(
        source_id: String,
        script_url: &str,
        query_base: Option<&str>,
        sheets: SheetNames,
    ) -> Result<Self, ConfigError> {
        if source_id.trim().is_empty() {
            return Err(ConfigError::MissingValue { name: "source_id" });
        }
        let script_url = parse_base_url("script_url", script_url)?;
        let query_base = parse_base_url("query_base", query_base.unwrap_or(DEFAULT_QUERY_BASE))?;
        Ok(Self { source_id, script_url, query_base, sheets })
    }

    /// URL of the read API query for one sheet.
    pub fn query_url(&self, sheet: &str) -> Url {
        let mut url = self.query_base.clone();
        url.path_segments_mut()
            .expect("Base URL validated at construction")
            .push(&self.source_id)
            .push("gviz")
            .push("tq");
        url.query_pairs_mut()
            .append_pair("tqx", "out:json")
            .append_pair("sheet", sheet);
        url
    }

    /// URL of the script endpoint's fetch action for one sheet.
    pub fn script_fetch_url(&self, sheet: &str) -> Url {
        let mut url = self.script_url.clone();
        url.query_pairs_mut()
            .append_pair("sheet", sheet)
            .append_pair("action", "fetch");
        url
    }
}

fn parse_base_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::NotABaseUrl { name });
    }
    Ok(url)
}
