//! IRIs of the RDF, RDFS, OWL and OBO vocabulary terms the pipeline reads

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_DESCRIPTION: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Description";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
pub const OWL_DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
pub const OWL_VERSION_IRI: &str = "http://www.w3.org/2002/07/owl#versionIRI";

pub const OBO_IN_OWL_NAMESPACE: &str = "http://www.geneontology.org/formats/oboInOwl#hasOBONamespace";
pub const OBO_IN_OWL_EXACT_SYNONYM: &str =
    "http://www.geneontology.org/formats/oboInOwl#hasExactSynonym";
pub const OBO_IN_OWL_RELATED_SYNONYM: &str =
    "http://www.geneontology.org/formats/oboInOwl#hasRelatedSynonym";
pub const OBO_IN_OWL_ALTERNATIVE_ID: &str =
    "http://www.geneontology.org/formats/oboInOwl#hasAlternativeId";
pub const OBO_IN_OWL_DB_XREF: &str = "http://www.geneontology.org/formats/oboInOwl#hasDbXref";

/// IAO definition annotation
pub const IAO_DEFINITION: &str = "http://purl.obolibrary.org/obo/IAO_0000115";

pub const BFO_PART_OF: &str = "http://purl.obolibrary.org/obo/BFO_0000050";
pub const BFO_HAS_PART: &str = "http://purl.obolibrary.org/obo/BFO_0000051";
pub const RO_CAPABLE_OF: &str = "http://purl.obolibrary.org/obo/RO_0002215";
