//! RDF/XML reading
//!
//! Documents are parsed with `oxrdfxml`, which handles the full RDF/XML
//! grammar OBO ontologies are published in (nested anonymous restrictions,
//! `rdf:parseType="Collection"`, `xml:base`, DOCTYPE entities such as
//! `<!ENTITY obo "http://purl.obolibrary.org/obo/">`). Anonymous nodes get
//! parser-generated ids that never collide with document `rdf:nodeID`s.

use super::{vocab, Graph, Statement, TermExt};
use oxrdfxml::{RdfXmlParseError, RdfXmlParser};
use tracing::debug;

/// Errors raised while reading an RDF/XML document
#[derive(Debug, thiserror::Error)]
pub enum RdfXmlError {
    #[error(transparent)]
    Parse(#[from] RdfXmlParseError),

    #[error("Document contains no RDF content")]
    Empty,
}

type Result<T> = std::result::Result<T, RdfXmlError>;

fn parser(base_iri: Option<&str>) -> RdfXmlParser {
    let Some(base) = base_iri else {
        return RdfXmlParser::new();
    };

    match RdfXmlParser::new().with_base_iri(base) {
        Ok(parser) => parser,
        Err(e) => {
            debug!(base, error = %e, "Ignoring invalid base IRI");
            RdfXmlParser::new()
        },
    }
}

/// Parse a complete RDF/XML document into a graph
pub fn parse(bytes: &[u8]) -> Result<Graph> {
    parse_with_base(bytes, None)
}

/// Parse a document, resolving relative IRIs against `base_iri` when the
/// document declares no `xml:base` of its own
pub fn parse_with_base(bytes: &[u8], base_iri: Option<&str>) -> Result<Graph> {
    let mut graph = Graph::new();
    for triple in parser(base_iri).for_reader(bytes) {
        graph.insert(Statement::from(triple?));
    }

    if graph.is_empty() {
        return Err(RdfXmlError::Empty);
    }

    Ok(graph)
}

/// Look for the `owl:versionIRI` of a document without building a graph.
///
/// Works on truncated input (e.g. the first few kilobytes of a ranged
/// download): triples are read as they stream out of the parser, and the
/// scan stops at the version triple, at the first class declaration, or at
/// the first syntax error.
pub fn find_version_iri(bytes: &[u8]) -> Option<String> {
    for triple in RdfXmlParser::new().for_reader(bytes) {
        let statement = match triple {
            Ok(triple) => Statement::from(triple),
            Err(e) => {
                debug!(error = %e, "Stopped version scan at malformed or truncated XML");
                return None;
            },
        };

        match statement.predicate.as_str() {
            vocab::OWL_VERSION_IRI => return statement.object.as_iri().map(str::to_string),
            vocab::RDF_TYPE if statement.object.is(vocab::OWL_CLASS) => return None,
            _ => {},
        }
    }
    None
}
