//! BioKG Ingest Library
//!
//! Converts biological ontologies and annotation files into a uniform stream
//! of graph tuples: nodes `(id, label, properties)` and edges
//! `(source, target, label, properties)`.
//!
//! # Supported Sources
//!
//! - **Gene Ontology** (`go`), split into its three subontologies
//! - **Cell Ontology** (`cl`)
//! - **UBERON** (`uberon`)
//! - **Human Phenotype Ontology** (`hpo`)
//! - **GO annotation files** (GAF 2.x)
//!
//! # Example
//!
//! ```no_run
//! use biokg_ingest::context::IngestContext;
//! use biokg_ingest::ontology::{AdapterConfig, FetchConfig, Mode};
//! use biokg_ingest::registry::AdapterKind;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AdapterConfig::builder()
//!         .mode(Mode::Edge)
//!         .label("part_of")
//!         .cache_dir("./cache");
//!     let mut adapter = AdapterKind::CellOntology.ontology_adapter(config)?;
//!
//!     let mut ctx = IngestContext::new(FetchConfig::from_adapter(adapter.config()))?;
//!     adapter.load(&mut ctx).await?;
//!
//!     for edge in adapter.edges()? {
//!         println!("{} -[{}]-> {}", edge.source, edge.label, edge.target);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod context;
pub mod gaf;
pub mod ontology;
pub mod rdf;
pub mod registry;
