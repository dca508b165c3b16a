// Ontology profiles
//
// Everything that differs between the supported ontologies is data: the
// document URL, which IRIs count as terms, the output labels, and which
// relations each edge label accepts. One extraction engine runs them all.

use super::config::Mode;
use super::{OntologyError, Result};
use crate::rdf::vocab;

/// Relation names emitted as `rel_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelType {
    Subclass,
    PartOf,
    HasPart,
    CapableOf,
    Dbxref,
}

impl RelType {
    /// Map a predicate IRI onto the fixed relation vocabulary
    pub fn from_predicate(predicate: &str) -> Option<Self> {
        match predicate {
            vocab::RDFS_SUBCLASS_OF => Some(RelType::Subclass),
            vocab::BFO_PART_OF => Some(RelType::PartOf),
            vocab::BFO_HAS_PART => Some(RelType::HasPart),
            vocab::RO_CAPABLE_OF => Some(RelType::CapableOf),
            vocab::OBO_IN_OWL_DB_XREF => Some(RelType::Dbxref),
            _ => None,
        }
    }

    pub fn predicate(self) -> &'static str {
        match self {
            RelType::Subclass => vocab::RDFS_SUBCLASS_OF,
            RelType::PartOf => vocab::BFO_PART_OF,
            RelType::HasPart => vocab::BFO_HAS_PART,
            RelType::CapableOf => vocab::RO_CAPABLE_OF,
            RelType::Dbxref => vocab::OBO_IN_OWL_DB_XREF,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RelType::Subclass => "subclass",
            RelType::PartOf => "part_of",
            RelType::HasPart => "has_part",
            RelType::CapableOf => "capable_of",
            RelType::Dbxref => "dbxref",
        }
    }
}

/// A node output label
#[derive(Debug)]
pub struct NodeLabel {
    pub label: &'static str,
    /// Restrict to terms of this subontology
    pub partition: Option<&'static str>,
}

/// What one edge label accepts
#[derive(Debug)]
pub struct EdgeRule {
    pub label: &'static str,
    /// Predicates whose triples are walked
    pub predicates: &'static [&'static str],
    /// Relations accepted after resolution. Order matters for class
    /// expressions: the first relation that resolves wins.
    pub rel_types: &'static [RelType],
    /// Allowed source IRI prefixes (empty = any)
    pub source_prefixes: &'static [&'static str],
    /// Allowed target IRI prefixes (empty = any); not applied to cross references
    pub target_prefixes: &'static [&'static str],
    /// Source term must belong to this subontology
    pub partition: Option<&'static str>,
}

impl EdgeRule {
    pub fn accepts(&self, rel: RelType) -> bool {
        self.rel_types.contains(&rel)
    }

    /// Relations tried when unwrapping a class expression
    pub fn resolution_contexts(&self) -> Vec<&'static str> {
        self.rel_types
            .iter()
            .filter(|r| **r != RelType::Dbxref)
            .map(|r| r.predicate())
            .collect()
    }

    pub fn source_allowed(&self, iri: &str) -> bool {
        has_prefix(iri, self.source_prefixes)
    }

    pub fn target_allowed(&self, iri: &str) -> bool {
        has_prefix(iri, self.target_prefixes)
    }
}

fn has_prefix(iri: &str, prefixes: &[&str]) -> bool {
    prefixes.is_empty() || prefixes.iter().any(|p| iri.starts_with(p))
}

#[derive(Debug)]
pub struct OntologyProfile {
    pub id: &'static str,
    pub url: &'static str,
    /// Provenance name
    pub source: &'static str,
    /// IRIs accepted as terms (empty = any)
    pub node_prefixes: &'static [&'static str],
    /// Subontologies recognized by the classifier (empty = unpartitioned)
    pub partitions: &'static [&'static str],
    pub node_labels: &'static [NodeLabel],
    pub edge_rules: &'static [EdgeRule],
}

/// Label selected for an adapter
#[derive(Debug, Clone, Copy)]
pub enum Selection {
    Nodes(&'static NodeLabel),
    Edges(&'static EdgeRule),
}

impl Selection {
    pub fn partition(&self) -> Option<&'static str> {
        match self {
            Selection::Nodes(n) => n.partition,
            Selection::Edges(e) => e.partition,
        }
    }
}

impl OntologyProfile {
    pub fn is_term(&self, iri: &str) -> bool {
        has_prefix(iri, self.node_prefixes)
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partitions.is_empty()
    }

    pub fn labels(&self, mode: Mode) -> Vec<&'static str> {
        match mode {
            Mode::Node => self.node_labels.iter().map(|n| n.label).collect(),
            Mode::Edge => self.edge_rules.iter().map(|e| e.label).collect(),
        }
    }

    /// Resolve an output label for the given mode
    pub fn select(&'static self, mode: Mode, label: &str) -> Result<Selection> {
        let selection = match mode {
            Mode::Node => self
                .node_labels
                .iter()
                .find(|n| n.label == label)
                .map(Selection::Nodes),
            Mode::Edge => self
                .edge_rules
                .iter()
                .find(|e| e.label == label)
                .map(Selection::Edges),
        };

        selection.ok_or_else(|| OntologyError::InvalidLabel {
            ontology: self.id.to_string(),
            mode,
            label: label.to_string(),
        })
    }
}

/// Look up a profile by ontology id
pub fn find(id: &str) -> Result<&'static OntologyProfile> {
    PROFILES
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| OntologyError::UnknownOntology(id.to_string()))
}

// ============================================================================
// Profiles
// ============================================================================

pub const BIOLOGICAL_PROCESS: &str = "biological_process";
pub const MOLECULAR_FUNCTION: &str = "molecular_function";
pub const CELLULAR_COMPONENT: &str = "cellular_component";

const GO_TERM: &str = "http://purl.obolibrary.org/obo/GO_";
const CL_TERM: &str = "http://purl.obolibrary.org/obo/CL_";
const UBERON_TERM: &str = "http://purl.obolibrary.org/obo/UBERON_";
const HP_TERM: &str = "http://purl.obolibrary.org/obo/HP_";

const HIERARCHY: &[RelType] = &[RelType::PartOf, RelType::HasPart, RelType::Subclass];

const fn go_edges(label: &'static str, partition: &'static str) -> EdgeRule {
    EdgeRule {
        label,
        predicates: &[vocab::RDFS_SUBCLASS_OF],
        rel_types: HIERARCHY,
        source_prefixes: &[GO_TERM],
        target_prefixes: &[GO_TERM],
        partition: Some(partition),
    }
}

pub static PROFILES: &[OntologyProfile] = &[
    OntologyProfile {
        id: "go",
        url: "http://purl.obolibrary.org/obo/go.owl",
        source: "Gene Ontology",
        node_prefixes: &[GO_TERM],
        partitions: &[BIOLOGICAL_PROCESS, MOLECULAR_FUNCTION, CELLULAR_COMPONENT],
        node_labels: &[
            NodeLabel {
                label: BIOLOGICAL_PROCESS,
                partition: Some(BIOLOGICAL_PROCESS),
            },
            NodeLabel {
                label: MOLECULAR_FUNCTION,
                partition: Some(MOLECULAR_FUNCTION),
            },
            NodeLabel {
                label: CELLULAR_COMPONENT,
                partition: Some(CELLULAR_COMPONENT),
            },
        ],
        edge_rules: &[
            go_edges("biological_process_subclass_of", BIOLOGICAL_PROCESS),
            go_edges("molecular_function_subclass_of", MOLECULAR_FUNCTION),
            go_edges("cellular_component_subclass_of", CELLULAR_COMPONENT),
        ],
    },
    OntologyProfile {
        id: "cl",
        url: "http://purl.obolibrary.org/obo/cl.owl",
        source: "Cell Ontology",
        node_prefixes: &[CL_TERM],
        partitions: &[],
        node_labels: &[NodeLabel {
            label: "cl",
            partition: None,
        }],
        edge_rules: &[
            EdgeRule {
                label: "cl_subtype_of",
                predicates: &[vocab::RDFS_SUBCLASS_OF],
                rel_types: &[RelType::Subclass],
                source_prefixes: &[CL_TERM],
                target_prefixes: &[CL_TERM],
                partition: None,
            },
            EdgeRule {
                label: "capable_of",
                predicates: &[
                    vocab::RO_CAPABLE_OF,
                    vocab::RDFS_SUBCLASS_OF,
                    vocab::OWL_EQUIVALENT_CLASS,
                ],
                rel_types: &[RelType::CapableOf],
                source_prefixes: &[CL_TERM],
                target_prefixes: &[GO_TERM],
                partition: None,
            },
            EdgeRule {
                label: "part_of",
                predicates: &[
                    vocab::BFO_PART_OF,
                    vocab::RDFS_SUBCLASS_OF,
                    vocab::OWL_EQUIVALENT_CLASS,
                ],
                rel_types: &[RelType::PartOf],
                source_prefixes: &[CL_TERM],
                target_prefixes: &[UBERON_TERM],
                partition: None,
            },
        ],
    },
    OntologyProfile {
        id: "uberon",
        url: "http://purl.obolibrary.org/obo/uberon.owl",
        source: "UBERON",
        node_prefixes: &[],
        partitions: &[],
        node_labels: &[NodeLabel {
            label: "uberon",
            partition: None,
        }],
        edge_rules: &[EdgeRule {
            label: "uberon",
            predicates: &[vocab::RDFS_SUBCLASS_OF, vocab::OBO_IN_OWL_DB_XREF],
            rel_types: &[
                RelType::PartOf,
                RelType::HasPart,
                RelType::Subclass,
                RelType::Dbxref,
            ],
            source_prefixes: &[],
            target_prefixes: &[],
            partition: None,
        }],
    },
    OntologyProfile {
        id: "hpo",
        url: "http://purl.obolibrary.org/obo/hp.owl",
        source: "Human Phenotype Ontology",
        node_prefixes: &[HP_TERM],
        partitions: &[],
        node_labels: &[NodeLabel {
            label: "hpo",
            partition: None,
        }],
        edge_rules: &[EdgeRule {
            label: "hpo",
            predicates: &[vocab::RDFS_SUBCLASS_OF],
            rel_types: HIERARCHY,
            source_prefixes: &[HP_TERM],
            target_prefixes: &[HP_TERM],
            partition: None,
        }],
    },
];
