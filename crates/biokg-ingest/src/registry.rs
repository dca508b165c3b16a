//! Adapter registry
//!
//! Maps configuration keys to adapter kinds. The set is closed: adding a
//! source means adding a variant here (and a profile, for ontologies).

use crate::ontology::config::AdapterConfigBuilder;
use crate::ontology::profile::{self, OntologyProfile};
use crate::ontology::{OntologyAdapter, OntologyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    GeneOntology,
    CellOntology,
    Uberon,
    HumanPhenotypeOntology,
    /// GO annotation files
    Gaf,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 5] = [
        AdapterKind::GeneOntology,
        AdapterKind::CellOntology,
        AdapterKind::Uberon,
        AdapterKind::HumanPhenotypeOntology,
        AdapterKind::Gaf,
    ];

    /// Resolve a configuration key such as `gene_ontology` or `go`
    pub fn from_key(key: &str) -> Result<Self> {
        match key.trim().to_lowercase().as_str() {
            "gene_ontology" | "go" => Ok(AdapterKind::GeneOntology),
            "cell_ontology" | "cl" => Ok(AdapterKind::CellOntology),
            "uberon" => Ok(AdapterKind::Uberon),
            "human_phenotype_ontology" | "hpo" => Ok(AdapterKind::HumanPhenotypeOntology),
            "gaf" => Ok(AdapterKind::Gaf),
            other => Err(OntologyError::Config(format!("Unknown adapter '{}'", other))),
        }
    }

    /// Canonical configuration key
    pub fn key(self) -> &'static str {
        match self {
            AdapterKind::GeneOntology => "gene_ontology",
            AdapterKind::CellOntology => "cell_ontology",
            AdapterKind::Uberon => "uberon",
            AdapterKind::HumanPhenotypeOntology => "human_phenotype_ontology",
            AdapterKind::Gaf => "gaf",
        }
    }

    /// Ontology id behind an ontology adapter
    pub fn ontology_id(self) -> Option<&'static str> {
        match self {
            AdapterKind::GeneOntology => Some("go"),
            AdapterKind::CellOntology => Some("cl"),
            AdapterKind::Uberon => Some("uberon"),
            AdapterKind::HumanPhenotypeOntology => Some("hpo"),
            AdapterKind::Gaf => None,
        }
    }

    pub fn profile(self) -> Option<&'static OntologyProfile> {
        self.ontology_id().and_then(|id| profile::find(id).ok())
    }

    /// Construct the ontology adapter for this kind
    pub fn ontology_adapter(self, config: AdapterConfigBuilder) -> Result<OntologyAdapter> {
        let Some(id) = self.ontology_id() else {
            return Err(OntologyError::Config(format!(
                "'{}' is not an ontology adapter",
                self.key()
            )));
        };

        OntologyAdapter::new(config.ontology(id).build())
    }
}
