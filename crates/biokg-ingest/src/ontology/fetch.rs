// Ontology document fetch and cache
//
// Layout of the cache directory, per ontology id:
//
//   <id>.owl        the document as downloaded
//   <id>_meta.json  {date, url, hash, version}
//
// A cached copy is used while it is younger than the expiration window and
// its version matches the remote one (or either version is unknown). The
// remote version is read with a ranged GET of the document head rather
// than a full download.

use super::config::AdapterConfig;
use super::version::{self, UNKNOWN_VERSION};
use super::{OntologyError, Result};
use crate::rdf::{vocab, xml, Graph, TermExt};
use biokg_common::checksum::{compute_bytes_checksum, verify_file_checksum};
use biokg_common::types::ChecksumAlgorithm;
use chrono::{DateTime, Duration, Utc};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::RANGE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Bytes requested when probing the remote version
pub const DEFAULT_HEAD_BYTES: u64 = 64 * 1024;

/// Configuration for ontology downloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Cache directory (None disables caching)
    pub cache_dir: Option<PathBuf>,

    /// Maximum age of a cached document
    pub expiration_days: i64,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Size of the ranged request used to read the remote version IRI
    pub head_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            expiration_days: 30,
            timeout_secs: 600, // large ontologies (GO, UBERON) take minutes
            user_agent: "BioKG-Ontology-Ingester/1.0".to_string(),
            head_bytes: DEFAULT_HEAD_BYTES,
        }
    }
}

impl FetchConfig {
    pub fn from_adapter(config: &AdapterConfig) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            expiration_days: config.cache_expiration_days,
            timeout_secs: config.http_timeout_secs,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(OntologyError::Config("Timeout must be greater than 0".to_string()));
        }
        if self.expiration_days < 0 {
            return Err(OntologyError::Config(
                "Cache expiration must not be negative".to_string(),
            ));
        }
        if self.head_bytes == 0 {
            return Err(OntologyError::Config("Head size must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Contents of `<id>_meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// When the document was stored
    pub date: DateTime<Utc>,
    pub url: String,
    /// SHA-256 of the stored document
    pub hash: String,
    pub version: String,
}

impl CacheMeta {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            OntologyError::Metadata(format!("Unreadable cache metadata {}: {}", path.display(), e))
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn is_expired(&self, now: DateTime<Utc>, expiration_days: i64) -> bool {
        now - self.date > Duration::days(expiration_days)
    }
}

/// Whether a cached document may be used instead of a fresh download.
///
/// Requires the cache to be unexpired. Beyond that the versions must agree,
/// unless either side is unknown.
pub fn should_use_cache(
    meta: &CacheMeta,
    remote_version: Option<&str>,
    now: DateTime<Utc>,
    expiration_days: i64,
) -> bool {
    if meta.is_expired(now, expiration_days) {
        return false;
    }

    match remote_version {
        Some(remote) if version::is_known(remote) && version::is_known(&meta.version) => {
            version::normalize(remote) == version::normalize(&meta.version)
        },
        _ => true,
    }
}

/// A parsed ontology document
#[derive(Debug)]
pub struct LoadedOntology {
    pub graph: Graph,
    pub version: String,
    pub from_cache: bool,
}

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    pub ontology: String,
    pub cached_version: Option<String>,
    pub remote_version: Option<String>,
    pub expired: bool,
    pub update_available: bool,
}

/// Downloads ontology documents and maintains the document cache
pub struct OntologyFetcher {
    client: Client,
    config: FetchConfig,
}

impl OntologyFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn document_path(&self, ontology: &str) -> Option<PathBuf> {
        self.config
            .cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.owl", ontology)))
    }

    pub fn meta_path(&self, ontology: &str) -> Option<PathBuf> {
        self.config
            .cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}_meta.json", ontology)))
    }

    /// Cache metadata for an ontology, if present and readable
    pub fn cached_meta(&self, ontology: &str) -> Option<CacheMeta> {
        let path = self.meta_path(ontology)?;
        if !path.exists() {
            return None;
        }
        match CacheMeta::read(&path) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!(ontology, error = %e, "Ignoring unreadable cache metadata");
                None
            },
        }
    }

    /// Load an ontology graph, from the cache when it is fresh
    pub async fn load(&self, ontology: &str, url: &str) -> Result<LoadedOntology> {
        if let Some(path) = local_path(url) {
            info!(ontology, path = %path.display(), "Loading ontology from local file");
            let bytes = tokio::fs::read(&path).await?;
            let graph = xml::parse(&bytes)?;
            let version = extract_version(&graph, &bytes);
            info!(ontology, version = %version, triples = graph.len(), "Loaded ontology");
            return Ok(LoadedOntology {
                graph,
                version,
                from_cache: false,
            });
        }

        if let Some(loaded) = self.load_cached(ontology, url).await? {
            return Ok(loaded);
        }

        info!(ontology, url, "Downloading ontology");
        let bytes = self.download(url).await?;
        let graph = xml::parse_with_base(&bytes, Some(url))?;
        let version = extract_version(&graph, &bytes);
        info!(ontology, version = %version, triples = graph.len(), "Parsed ontology");

        if let (Some(doc_path), Some(meta_path)) =
            (self.document_path(ontology), self.meta_path(ontology))
        {
            self.store(&doc_path, &meta_path, url, &bytes, &version)?;
        }

        Ok(LoadedOntology {
            graph,
            version,
            from_cache: false,
        })
    }

    async fn load_cached(&self, ontology: &str, url: &str) -> Result<Option<LoadedOntology>> {
        let Some(doc_path) = self.document_path(ontology) else {
            return Ok(None);
        };
        if !doc_path.exists() {
            debug!(ontology, "No cached document");
            return Ok(None);
        }
        let Some(meta) = self.cached_meta(ontology) else {
            return Ok(None);
        };

        let remote = self.fetch_remote_version(url).await;
        let expired = meta.is_expired(Utc::now(), self.config.expiration_days);
        info!(
            ontology,
            expired,
            remote_version = remote.as_deref().unwrap_or(UNKNOWN_VERSION),
            cached_version = %meta.version,
            "Cache status"
        );

        if !should_use_cache(&meta, remote.as_deref(), Utc::now(), self.config.expiration_days) {
            info!(ontology, "Cached document is stale; refreshing");
            return Ok(None);
        }

        if let Err(e) = verify_file_checksum(&doc_path, &meta.hash, ChecksumAlgorithm::Sha256) {
            warn!(ontology, error = %e, "Cached document failed verification; refreshing");
            return Ok(None);
        }

        let bytes = tokio::fs::read(&doc_path).await?;
        let graph = xml::parse_with_base(&bytes, Some(url))?;
        info!(ontology, version = %meta.version, triples = graph.len(), "Using cached ontology");

        Ok(Some(LoadedOntology {
            graph,
            version: meta.version,
            from_cache: true,
        }))
    }

    fn store(&self, doc_path: &Path, meta_path: &Path, url: &str, bytes: &[u8], version: &str) -> Result<()> {
        if let Some(dir) = doc_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(doc_path, bytes)?;

        let meta = CacheMeta {
            date: Utc::now(),
            url: url.to_string(),
            hash: compute_bytes_checksum(bytes, ChecksumAlgorithm::Sha256),
            version: version.to_string(),
        };
        meta.write(meta_path)?;

        debug!(path = %doc_path.display(), hash = %meta.hash, "Stored ontology in cache");
        Ok(())
    }

    /// Read the remote version from the head of the document.
    ///
    /// Any failure yields `None`; the caller then decides on cache age alone.
    pub async fn fetch_remote_version(&self, url: &str) -> Option<String> {
        if local_path(url).is_some() {
            return None;
        }

        let response = match self
            .client
            .get(url)
            .header(RANGE, format!("bytes=0-{}", self.config.head_bytes - 1))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(url, status = %response.status(), "Version check rejected");
                return None;
            },
            Err(e) => {
                debug!(url, error = %e, "Version check failed");
                return None;
            },
        };

        // Servers that ignore Range send the whole document; stop reading early
        let limit = self.config.head_bytes as usize;
        let mut head = Vec::with_capacity(limit);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => head.extend_from_slice(&chunk),
                Err(e) => {
                    debug!(url, error = %e, "Version check interrupted");
                    break;
                },
            }
            if head.len() >= limit {
                break;
            }
        }

        let iri = xml::find_version_iri(&head)?;
        let version = version::version_from_iri(&iri);
        version::is_known(&version).then(|| version::normalize(&version).to_string())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(OntologyError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let total_size = response.content_length().unwrap_or(0);
        let progress = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            progress.set_style(style.progress_chars("#>-"));
        }

        let mut bytes = Vec::with_capacity(total_size as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            bytes.extend_from_slice(&chunk);
            progress.set_position(bytes.len() as u64);
        }
        progress.finish_and_clear();

        info!(url, bytes = bytes.len(), "Downloaded ontology ({} KB)", bytes.len() / 1024);
        Ok(bytes)
    }

    /// Report whether `load` would download a fresh copy
    pub async fn check_for_updates(&self, ontology: &str, url: &str) -> Result<UpdateStatus> {
        let remote_version = self.fetch_remote_version(url).await;

        let status = match self.cached_meta(ontology) {
            Some(meta) => {
                let cached_present = self.document_path(ontology).is_some_and(|p| p.exists());
                let now = Utc::now();
                UpdateStatus {
                    ontology: ontology.to_string(),
                    expired: meta.is_expired(now, self.config.expiration_days),
                    update_available: !cached_present
                        || !should_use_cache(
                            &meta,
                            remote_version.as_deref(),
                            now,
                            self.config.expiration_days,
                        ),
                    cached_version: Some(meta.version),
                    remote_version,
                }
            },
            None => UpdateStatus {
                ontology: ontology.to_string(),
                cached_version: None,
                remote_version,
                expired: true,
                update_available: true,
            },
        };

        info!(
            ontology,
            update_available = status.update_available,
            "Checked for ontology updates"
        );
        Ok(status)
    }
}

/// Version token of a parsed document.
///
/// Prefers the graph's `owl:versionIRI`, then a scan of the raw XML, then
/// `"unknown"`.
pub fn extract_version(graph: &Graph, bytes: &[u8]) -> String {
    let iri = graph
        .any_value(vocab::OWL_VERSION_IRI)
        .and_then(|t| t.as_iri().map(str::to_string))
        .or_else(|| xml::find_version_iri(bytes));

    match iri {
        Some(iri) => version::normalize(&version::version_from_iri(&iri)).to_string(),
        None => {
            debug!("Document declares no version IRI");
            UNKNOWN_VERSION.to_string()
        },
    }
}

/// `file://` URLs and bare paths are read from disk
fn local_path(url: &str) -> Option<PathBuf> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(PathBuf::from(path));
    }
    (!url.contains("://")).then(|| PathBuf::from(url))
}
