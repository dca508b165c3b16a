// Ontology ingestion
//
// OWL documents are fetched (or served from the local cache), parsed into an
// in-memory RDF graph, indexed by the predicate cache, and walked by a single
// extraction engine driven by per-ontology profiles.

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod key;
pub mod profile;
pub mod restriction;
pub mod subontology;
pub mod version;

pub use cache::{Collection, PredicateCache};
pub use config::{AdapterConfig, AdapterConfigBuilder, Mode};
pub use extract::{EdgeStream, NodeStream, OntologyAdapter, DRY_RUN_LIMIT};
pub use fetch::{CacheMeta, FetchConfig, LoadedOntology, OntologyFetcher, UpdateStatus};
pub use key::{to_key, xref_key};
pub use profile::{EdgeRule, OntologyProfile, RelType};
pub use restriction::RestrictionResolver;
pub use subontology::SubontologyClassifier;

use crate::rdf::xml::RdfXmlError;

pub type Result<T> = std::result::Result<T, OntologyError>;

/// Error types for ontology ingestion
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown ontology '{0}'")]
    UnknownOntology(String),

    #[error("Invalid label '{label}' for ontology '{ontology}' in {mode} mode")]
    InvalidLabel {
        ontology: String,
        mode: Mode,
        label: String,
    },

    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RDF/XML error: {0}")]
    Xml(#[from] RdfXmlError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl From<biokg_common::Error> for OntologyError {
    fn from(err: biokg_common::Error) -> Self {
        match err {
            biokg_common::Error::Io(e) => OntologyError::Io(e),
            biokg_common::Error::Serialization(e) => OntologyError::Serialization(e),
            other => OntologyError::Metadata(other.to_string()),
        }
    }
}
