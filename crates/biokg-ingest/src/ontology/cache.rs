// Predicate cache
//
// One pass over the triples of each interesting predicate, indexed by the
// key of the subject, so that per-node lookups during extraction
// are hash lookups instead of graph scans.

use super::key::term_key;
use crate::rdf::{vocab, Graph, Term, TermExt};
use std::collections::HashMap;
use tracing::debug;

/// Named multi-valued lookups held by the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Labels,
    Namespaces,
    Descriptions,
    RelatedSynonyms,
    ExactSynonyms,
    AlternativeIds,
    Deprecated,
    Types,
    OnProperty,
    SomeValuesFrom,
    AllValuesFrom,
    IntersectionOf,
}

impl Collection {
    /// Predicate IRI that feeds this collection
    pub fn predicate(self) -> &'static str {
        match self {
            Collection::Labels => vocab::RDFS_LABEL,
            Collection::Namespaces => vocab::OBO_IN_OWL_NAMESPACE,
            Collection::Descriptions => vocab::IAO_DEFINITION,
            Collection::RelatedSynonyms => vocab::OBO_IN_OWL_RELATED_SYNONYM,
            Collection::ExactSynonyms => vocab::OBO_IN_OWL_EXACT_SYNONYM,
            Collection::AlternativeIds => vocab::OBO_IN_OWL_ALTERNATIVE_ID,
            Collection::Deprecated => vocab::OWL_DEPRECATED,
            Collection::Types => vocab::RDF_TYPE,
            Collection::OnProperty => vocab::OWL_ON_PROPERTY,
            Collection::SomeValuesFrom => vocab::OWL_SOME_VALUES_FROM,
            Collection::AllValuesFrom => vocab::OWL_ALL_VALUES_FROM,
            Collection::IntersectionOf => vocab::OWL_INTERSECTION_OF,
        }
    }
}

const STRUCTURE: [Collection; 7] = [
    Collection::Namespaces,
    Collection::Deprecated,
    Collection::Types,
    Collection::OnProperty,
    Collection::SomeValuesFrom,
    Collection::AllValuesFrom,
    Collection::IntersectionOf,
];

const DESCRIPTIVE: [Collection; 5] = [
    Collection::Labels,
    Collection::Descriptions,
    Collection::RelatedSynonyms,
    Collection::ExactSynonyms,
    Collection::AlternativeIds,
];

/// Single-valued predicates cached for edge extraction
const EDGE_SINGLES: [&str; 2] = [vocab::RDFS_SUBCLASS_OF, vocab::OBO_IN_OWL_DB_XREF];

#[derive(Debug, Default)]
pub struct PredicateCache {
    collections: HashMap<Collection, HashMap<String, Vec<Term>>>,
    singles: HashMap<String, HashMap<String, Term>>,
}

impl PredicateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `(subject, object)` pair of `predicate`.
    ///
    /// With a collection the objects accumulate in document order; without
    /// one only the last object seen per subject is kept, under the
    /// predicate IRI.
    pub fn cache(&mut self, graph: &Graph, predicate: &str, collection: Option<Collection>) {
        let mut count = 0usize;

        match collection {
            Some(collection) => {
                let index = self.collections.entry(collection).or_default();
                for (subject, object) in graph.subject_objects(predicate) {
                    let Some(key) = term_key(subject) else {
                        continue;
                    };
                    index.entry(key).or_default().push(object.clone());
                    count += 1;
                }
            },
            None => {
                let index = self.singles.entry(predicate.to_string()).or_default();
                for (subject, object) in graph.subject_objects(predicate) {
                    let Some(key) = term_key(subject) else {
                        continue;
                    };
                    index.insert(key, object.clone());
                    count += 1;
                }
            },
        }

        debug!(predicate, ?collection, count, "Cached predicate");
    }

    /// Objects collected for `node`; empty when none were cached
    pub fn values(&self, node: &str, collection: Collection) -> &[Term] {
        self.collections
            .get(&collection)
            .and_then(|index| index.get(node))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Single value stored for `node` under `predicate`
    pub fn value(&self, node: &str, predicate: &str) -> Option<&Term> {
        self.singles.get(predicate)?.get(node)
    }

    pub fn first(&self, node: &str, collection: Collection) -> Option<&Term> {
        self.values(node, collection).first()
    }

    pub fn clear(&mut self) {
        self.collections.clear();
        self.singles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty() && self.singles.is_empty()
    }

    /// Predicates needed to build node tuples
    pub fn cache_node_properties(&mut self, graph: &Graph) {
        for collection in STRUCTURE.into_iter().chain(DESCRIPTIVE) {
            self.cache(graph, collection.predicate(), Some(collection));
        }
    }

    /// Predicates needed to build edge tuples
    pub fn cache_edge_properties(&mut self, graph: &Graph) {
        for collection in STRUCTURE {
            self.cache(graph, collection.predicate(), Some(collection));
        }
        for predicate in EDGE_SINGLES {
            self.cache(graph, predicate, None);
        }
    }

    /// `owl:deprecated "true"` on the node
    pub fn is_deprecated(&self, node: &str) -> bool {
        self.values(node, Collection::Deprecated)
            .iter()
            .any(|t| t.is_literal() && t.lexical().trim().eq_ignore_ascii_case("true"))
    }

    pub fn has_type(&self, node: &str, class: &str) -> bool {
        self.values(node, Collection::Types).iter().any(|t| t.is(class))
    }

    pub fn is_restriction(&self, node: &str) -> bool {
        self.has_type(node, vocab::OWL_RESTRICTION)
    }

    pub fn is_class(&self, node: &str) -> bool {
        self.has_type(node, vocab::OWL_CLASS)
    }

    /// Literal values of a collection as strings, in document order
    pub fn literals(&self, node: &str, collection: Collection) -> Vec<String> {
        self.values(node, collection)
            .iter()
            .filter(|t| t.is_literal())
            .map(|t| t.lexical().to_string())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::rdf::{iri, literal, Literal, NamedNode, Statement};

    fn obo(id: &str) -> Term {
        iri(format!("http://purl.obolibrary.org/obo/{}", id))
    }

    fn graph() -> Graph {
        let mut graph = Graph::new();
        let neuron = obo("CL_0000540");
        graph.insert(Statement::new(neuron.clone(), vocab::RDF_TYPE, iri(vocab::OWL_CLASS)));
        graph.insert(Statement::new(neuron.clone(), vocab::RDFS_LABEL, literal("neuron")));
        graph.insert(Statement::new(neuron.clone(), vocab::RDFS_LABEL, literal("nerve cell")));
        graph.insert(Statement::new(neuron.clone(), vocab::RDFS_SUBCLASS_OF, obo("CL_0000000")));
        graph.insert(Statement::new(neuron.clone(), vocab::RDFS_SUBCLASS_OF, obo("CL_0000393")));
        graph.insert(Statement::new(
            obo("CL_0000001"),
            vocab::OWL_DEPRECATED,
            Literal::new_typed_literal(
                "true",
                NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#boolean"),
            )
            .into(),
        ));
        graph
    }

    #[test]
    fn test_collection_accumulates_in_order() {
        let mut cache = PredicateCache::new();
        cache.cache_node_properties(&graph());

        assert_eq!(
            cache.literals("CL:0000540", Collection::Labels),
            vec!["neuron".to_string(), "nerve cell".to_string()]
        );
        assert!(cache.is_class("CL:0000540"));
        assert!(cache.values("CL:9999999", Collection::Labels).is_empty());
    }

    #[test]
    fn test_single_keeps_last_value() {
        let mut cache = PredicateCache::new();
        cache.cache_edge_properties(&graph());

        assert_eq!(
            cache.value("CL:0000540", vocab::RDFS_SUBCLASS_OF),
            Some(&obo("CL_0000393"))
        );
        assert_eq!(cache.value("CL:0000540", vocab::OBO_IN_OWL_DB_XREF), None);
    }

    #[test]
    fn test_deprecation_flag() {
        let mut cache = PredicateCache::new();
        cache.cache_edge_properties(&graph());

        assert!(cache.is_deprecated("CL:0000001"));
        assert!(!cache.is_deprecated("CL:0000540"));
    }

    #[test]
    fn test_blank_subjects_do_not_share_iri_keys() {
        let mut graph = graph();
        graph.insert(Statement::new(
            crate::rdf::blank("CL_0000540"),
            vocab::RDF_TYPE,
            iri(vocab::OWL_RESTRICTION),
        ));

        let mut cache = PredicateCache::new();
        cache.cache_edge_properties(&graph);

        assert!(cache.is_restriction("_:CL_0000540"));
        assert!(!cache.is_restriction("CL:0000540"));
        assert!(cache.is_class("CL:0000540"));
    }

    #[test]
    fn test_clear() {
        let mut cache = PredicateCache::new();
        cache.cache_node_properties(&graph());
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.values("CL:0000540", Collection::Labels).is_empty());
    }
}
