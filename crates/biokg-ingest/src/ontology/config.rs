// Ontology adapter configuration

use super::{OntologyError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which stream an adapter produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Node,
    Edge,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Node => write!(f, "node"),
            Mode::Edge => write!(f, "edge"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "node" | "nodes" => Ok(Mode::Node),
            "edge" | "edges" => Ok(Mode::Edge),
            other => Err(OntologyError::Config(format!("Invalid mode: {}", other))),
        }
    }
}

/// Configuration for one ontology adapter instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Ontology identifier (e.g., "go", "cl")
    pub ontology: String,

    pub mode: Mode,

    /// Output label; selects the partition or edge rule
    pub label: String,

    /// Attach properties to emitted tuples
    pub write_properties: bool,

    /// Attach `source` / `source_url` provenance
    pub add_provenance: bool,

    /// Attach the IAO definition as `description`
    pub add_description: bool,

    /// Directory for cached documents and subontology mappings (None = no caching)
    pub cache_dir: Option<PathBuf>,

    /// Maximum cache age before a re-fetch is forced
    pub cache_expiration_days: i64,

    /// HTTP timeout in seconds
    pub http_timeout_secs: u64,

    /// Emit at most a handful of tuples
    pub dry_run: bool,

    /// Override the profile's document URL (a URL, `file://` URL or local path)
    pub source_url: Option<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            ontology: String::new(),
            mode: Mode::Node,
            label: String::new(),
            write_properties: true,
            add_provenance: true,
            add_description: false,
            cache_dir: None,
            cache_expiration_days: 30,
            http_timeout_secs: 600,
            dry_run: false,
            source_url: None,
        }
    }
}

impl AdapterConfig {
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Load defaults from `BIOKG_*` environment variables
    ///
    /// - `BIOKG_CACHE_DIR`
    /// - `BIOKG_CACHE_EXPIRATION_DAYS`
    /// - `BIOKG_HTTP_TIMEOUT_SECS`
    /// - `BIOKG_DRY_RUN`, `BIOKG_WRITE_PROPERTIES`, `BIOKG_ADD_PROVENANCE`,
    ///   `BIOKG_ADD_DESCRIPTION` (true/false)
    pub fn from_env() -> Result<AdapterConfigBuilder> {
        let mut builder = Self::builder();

        if let Ok(dir) = std::env::var("BIOKG_CACHE_DIR") {
            builder = builder.cache_dir(dir);
        }

        if let Ok(days) = std::env::var("BIOKG_CACHE_EXPIRATION_DAYS") {
            let days = days.parse().map_err(|_| {
                OntologyError::Config(format!("Invalid BIOKG_CACHE_EXPIRATION_DAYS: {}", days))
            })?;
            builder = builder.cache_expiration_days(days);
        }

        if let Ok(secs) = std::env::var("BIOKG_HTTP_TIMEOUT_SECS") {
            let secs = secs.parse().map_err(|_| {
                OntologyError::Config(format!("Invalid BIOKG_HTTP_TIMEOUT_SECS: {}", secs))
            })?;
            builder = builder.http_timeout_secs(secs);
        }

        if let Some(flag) = env_flag("BIOKG_DRY_RUN")? {
            builder = builder.dry_run(flag);
        }
        if let Some(flag) = env_flag("BIOKG_WRITE_PROPERTIES")? {
            builder = builder.write_properties(flag);
        }
        if let Some(flag) = env_flag("BIOKG_ADD_PROVENANCE")? {
            builder = builder.add_provenance(flag);
        }
        if let Some(flag) = env_flag("BIOKG_ADD_DESCRIPTION")? {
            builder = builder.add_description(flag);
        }

        Ok(builder)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ontology.trim().is_empty() {
            return Err(OntologyError::Config("Ontology identifier cannot be empty".to_string()));
        }

        if self.label.trim().is_empty() {
            return Err(OntologyError::Config("Label cannot be empty".to_string()));
        }

        if self.cache_expiration_days < 0 {
            return Err(OntologyError::Config(
                "Cache expiration must not be negative".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(OntologyError::Config("Timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

fn env_flag(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(OntologyError::Config(format!("Invalid {}: {}", name, value))),
        },
        Err(_) => Ok(None),
    }
}

/// Builder for AdapterConfig
#[derive(Debug, Default)]
pub struct AdapterConfigBuilder {
    ontology: Option<String>,
    mode: Option<Mode>,
    label: Option<String>,
    write_properties: Option<bool>,
    add_provenance: Option<bool>,
    add_description: Option<bool>,
    cache_dir: Option<PathBuf>,
    cache_expiration_days: Option<i64>,
    http_timeout_secs: Option<u64>,
    dry_run: Option<bool>,
    source_url: Option<String>,
}

impl AdapterConfigBuilder {
    pub fn ontology(mut self, ontology: impl Into<String>) -> Self {
        self.ontology = Some(ontology.into());
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn write_properties(mut self, write: bool) -> Self {
        self.write_properties = Some(write);
        self
    }

    pub fn add_provenance(mut self, add: bool) -> Self {
        self.add_provenance = Some(add);
        self
    }

    pub fn add_description(mut self, add: bool) -> Self {
        self.add_description = Some(add);
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn cache_expiration_days(mut self, days: i64) -> Self {
        self.cache_expiration_days = Some(days);
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = Some(secs);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn build(self) -> AdapterConfig {
        let default = AdapterConfig::default();

        AdapterConfig {
            ontology: self.ontology.unwrap_or(default.ontology),
            mode: self.mode.unwrap_or(default.mode),
            label: self.label.unwrap_or(default.label),
            write_properties: self.write_properties.unwrap_or(default.write_properties),
            add_provenance: self.add_provenance.unwrap_or(default.add_provenance),
            add_description: self.add_description.unwrap_or(default.add_description),
            cache_dir: self.cache_dir.or(default.cache_dir),
            cache_expiration_days: self
                .cache_expiration_days
                .unwrap_or(default.cache_expiration_days),
            http_timeout_secs: self.http_timeout_secs.unwrap_or(default.http_timeout_secs),
            dry_run: self.dry_run.unwrap_or(default.dry_run),
            source_url: self.source_url.or(default.source_url),
        }
    }
}
