// Term key normalization
//
// Every node and edge endpoint is identified by a key derived from its IRI:
// `http://purl.obolibrary.org/obo/CL_0000084` becomes `CL:0000084`. Blank
// nodes are keyed as `_:<id>`; IRI keys never contain `_:`, so the two key
// spaces are disjoint.

use crate::rdf::Term;

/// Normalize an IRI into a term key.
///
/// Only the final path segment is kept. URL-ish punctuation is folded, every
/// underscore becomes the `:` id separator, and spaces are dropped. Keys that
/// would be purely numeric get a `number_` prefix. Only ASCII digits count:
/// a segment of other Unicode digits keeps its own spelling.
pub fn to_key(iri: &str) -> String {
    let segment = iri.rsplit('/').next().unwrap_or(iri);

    let key: String = segment
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| match c {
            '#' | '&' | '~' => '.',
            '?' | '=' | '/' | '_' => ':',
            other => other,
        })
        .collect();

    let digits: String = key.chars().filter(|c| *c != '.').collect();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        format!("number_{}", key)
    } else {
        key
    }
}

/// Key for an IRI or blank node; literals have none
pub fn term_key(term: &Term) -> Option<String> {
    match term {
        Term::NamedNode(node) => Some(to_key(node.as_str())),
        Term::BlankNode(node) => Some(format!("_:{}", node.as_str())),
        Term::Literal(_) => None,
    }
}

/// Key for a cross-reference literal such as `MESH:D000001`.
///
/// Returns `None` unless the literal has exactly one `:` separating two
/// non-empty parts.
pub fn xref_key(literal: &str) -> Option<String> {
    let mut parts = literal.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(db), Some(id), None) if !db.trim().is_empty() && !id.trim().is_empty() => {
            Some(format!("{}_{}", db.trim(), id.trim()))
        },
        _ => None,
    }
}
