//! BioKG Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the BioKG workspace.
//!
//! # Overview
//!
//! - **Error Handling**: Common error type and result alias
//! - **Checksums**: Content hashes recorded in cache metadata
//! - **Logging**: `tracing` subscriber bootstrap for binaries
//! - **Types**: The node/edge tuples every adapter produces
//!
//! # Example
//!
//! ```no_run
//! use biokg_common::checksum::compute_file_checksum;
//! use biokg_common::types::ChecksumAlgorithm;
//! use biokg_common::Result;
//!
//! fn hash_document(path: &str) -> Result<String> {
//!     compute_file_checksum(path, ChecksumAlgorithm::Sha256)
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{Edge, Node, PropValue, Properties};
