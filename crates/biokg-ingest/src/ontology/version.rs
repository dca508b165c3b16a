// Ontology version tokens
//
// OBO ontologies announce their release through `owl:versionIRI`, e.g.
// `http://purl.obolibrary.org/obo/cl/releases/2024-01-04/cl.owl` or
// `http://purl.obolibrary.org/obo/uberon/releases/v2.1/uberon.owl`.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder for a version that could not be determined
pub const UNKNOWN_VERSION: &str = "unknown";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    PATTERN.get_or_init(|| Regex::new(r"/(\d{4}-\d{2}-\d{2})/").expect("date pattern is valid"))
}

fn release_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    PATTERN.get_or_init(|| {
        Regex::new(r"/releases/v?([\d.]+)/").expect("release pattern is valid")
    })
}

/// Extract the version token from a version IRI.
///
/// A `YYYY-MM-DD` path segment wins, then a numbered release
/// (`/releases/v1.2/`), then the second-to-last path segment. The result
/// never carries a leading `v`.
pub fn version_from_iri(iri: &str) -> String {
    if let Some(caps) = date_pattern().captures(iri) {
        return caps[1].to_string();
    }

    if let Some(caps) = release_pattern().captures(iri) {
        return caps[1].to_string();
    }

    let segments: Vec<&str> = iri.split('/').collect();
    match segments.len() {
        n if n >= 2 && !segments[n - 2].is_empty() => normalize(segments[n - 2]).to_string(),
        _ => UNKNOWN_VERSION.to_string(),
    }
}

/// Strip leading `v` characters
pub fn normalize(version: &str) -> &str {
    version.trim().trim_start_matches('v')
}

pub fn is_known(version: &str) -> bool {
    let version = normalize(version);
    !version.is_empty() && version != UNKNOWN_VERSION
}
