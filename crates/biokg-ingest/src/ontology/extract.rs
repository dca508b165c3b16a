// Node and edge extraction
//
// A loaded ontology adapter exposes two single-pass streams over its graph.
// Both are pure functions of the document: the same bytes always yield the
// same tuples in the same order.

use super::cache::{Collection, PredicateCache};
use super::config::{AdapterConfig, Mode};
use super::key::{to_key, xref_key};
use super::profile::{self, EdgeRule, NodeLabel, OntologyProfile, RelType, Selection};
use super::restriction::RestrictionResolver;
use super::subontology::SubontologyClassifier;
use super::{OntologyError, Result};
use crate::context::IngestContext;
use crate::rdf::{vocab, Graph, Term, TermExt};
use biokg_common::{Edge, Node, PropValue, Properties};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Items emitted per stream in dry-run mode
pub const DRY_RUN_LIMIT: usize = 100;

/// Loaded state of an adapter
struct Loaded {
    graph: Graph,
    version: String,
    cache: PredicateCache,
    classifier: Option<Arc<SubontologyClassifier>>,
}

/// Extraction engine for one ontology and one output label
pub struct OntologyAdapter {
    profile: &'static OntologyProfile,
    selection: Selection,
    config: AdapterConfig,
    loaded: Option<Loaded>,
}

impl OntologyAdapter {
    /// Validate the configuration and resolve its label against the profile
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let profile = profile::find(&config.ontology)?;
        let selection = profile.select(config.mode, &config.label)?;

        Ok(Self {
            profile,
            selection,
            config,
            loaded: None,
        })
    }

    pub fn profile(&self) -> &'static OntologyProfile {
        self.profile
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Document URL: the configured override or the profile default
    pub fn url(&self) -> &str {
        self.config.source_url.as_deref().unwrap_or(self.profile.url)
    }

    /// Version of the loaded document
    pub fn version(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.version.as_str())
    }

    /// Fetch the document through the context and prepare the streams
    pub async fn load(&mut self, ctx: &mut IngestContext) -> Result<()> {
        let loaded = ctx.fetcher().load(self.profile.id, self.url()).await?;

        let classifier = if self.profile.is_partitioned() {
            Some(ctx.classifier(self.profile, &loaded.graph, &loaded.version)?)
        } else {
            None
        };

        self.load_graph(loaded.graph, loaded.version, classifier);
        Ok(())
    }

    /// Prepare the streams from an already parsed graph.
    ///
    /// Partitioned profiles need a classifier; without one no term matches a
    /// partition.
    pub fn load_graph(
        &mut self,
        graph: Graph,
        version: String,
        classifier: Option<Arc<SubontologyClassifier>>,
    ) {
        let mut cache = match self.loaded.take() {
            Some(previous) => previous.cache,
            None => PredicateCache::new(),
        };
        cache.clear();

        match self.config.mode {
            Mode::Node => cache.cache_node_properties(&graph),
            Mode::Edge => cache.cache_edge_properties(&graph),
        }

        info!(
            ontology = self.profile.id,
            label = %self.config.label,
            version = %version,
            triples = graph.len(),
            "Ontology ready"
        );

        self.loaded = Some(Loaded {
            graph,
            version,
            cache,
            classifier,
        });
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or_else(|| {
            OntologyError::Config(format!("Ontology '{}' has not been loaded", self.profile.id))
        })
    }

    fn limit(&self) -> Option<usize> {
        self.config.dry_run.then_some(DRY_RUN_LIMIT)
    }

    fn provenance(&self) -> Option<(String, String)> {
        (self.config.write_properties && self.config.add_provenance)
            .then(|| (self.profile.source.to_string(), self.url().to_string()))
    }

    /// Term stream; fails unless the adapter is in node mode and loaded
    pub fn nodes(&self) -> Result<NodeStream<'_>> {
        let Selection::Nodes(label) = self.selection else {
            return Err(OntologyError::Config(format!(
                "Adapter for '{}' is configured for edges",
                self.profile.id
            )));
        };
        let loaded = self.loaded()?;

        Ok(NodeStream {
            profile: self.profile,
            label,
            cache: &loaded.cache,
            classifier: loaded.classifier.as_deref(),
            candidates: loaded.graph.nodes().into_iter(),
            seen: HashSet::new(),
            write_properties: self.config.write_properties,
            add_description: self.config.add_description,
            provenance: self.provenance(),
            emitted: 0,
            limit: self.limit(),
        })
    }

    /// Relation stream; fails unless the adapter is in edge mode and loaded
    pub fn edges(&self) -> Result<EdgeStream<'_>> {
        let Selection::Edges(rule) = self.selection else {
            return Err(OntologyError::Config(format!(
                "Adapter for '{}' is configured for nodes",
                self.profile.id
            )));
        };
        let loaded = self.loaded()?;
        let graph = &loaded.graph;

        let pairs = rule.predicates.iter().flat_map(move |predicate| {
            graph
                .subject_objects(predicate)
                .map(move |(subject, object)| (*predicate, subject, object))
        });

        Ok(EdgeStream {
            rule,
            cache: &loaded.cache,
            classifier: loaded.classifier.as_deref(),
            resolver: RestrictionResolver::new(graph, &loaded.cache),
            contexts: rule.resolution_contexts(),
            pairs: Box::new(pairs),
            write_properties: self.config.write_properties,
            provenance: self.provenance(),
            emitted: 0,
            limit: self.limit(),
        })
    }
}

// ============================================================================
// Node stream
// ============================================================================

pub struct NodeStream<'a> {
    profile: &'static OntologyProfile,
    label: &'static NodeLabel,
    cache: &'a PredicateCache,
    classifier: Option<&'a SubontologyClassifier>,
    candidates: std::vec::IntoIter<&'a Term>,
    seen: HashSet<String>,
    write_properties: bool,
    add_description: bool,
    provenance: Option<(String, String)>,
    emitted: usize,
    limit: Option<usize>,
}

impl NodeStream<'_> {
    fn accept(&mut self, term: &Term) -> Option<String> {
        let iri = term.as_iri()?;
        if !self.profile.is_term(iri) {
            return None;
        }

        let key = to_key(iri);
        if self.seen.contains(&key)
            || !self.cache.is_class(&key)
            || self.cache.is_restriction(&key)
            || self.cache.is_deprecated(&key)
        {
            return None;
        }

        if let Some(partition) = self.label.partition {
            if self.classifier.and_then(|c| c.classify(&key)) != Some(partition) {
                return None;
            }
        }

        self.seen.insert(key.clone());
        Some(key)
    }

    fn properties(&self, key: &str) -> Properties {
        let mut props = Properties::new();
        if !self.write_properties {
            return props;
        }

        let names = self.cache.literals(key, Collection::Labels);
        if !names.is_empty() {
            props.insert("term_name".to_string(), PropValue::Text(names.join(", ")));
        }

        let mut synonyms = self.cache.literals(key, Collection::RelatedSynonyms);
        synonyms.extend(self.cache.literals(key, Collection::ExactSynonyms));
        if !synonyms.is_empty() {
            props.insert("synonyms".to_string(), PropValue::List(synonyms));
        }

        let alternative_ids = self.cache.literals(key, Collection::AlternativeIds);
        if !alternative_ids.is_empty() {
            props.insert("alternative_ids".to_string(), PropValue::List(alternative_ids));
        }

        if self.add_description {
            let description = self.cache.literals(key, Collection::Descriptions).join(" ");
            if !description.is_empty() {
                props.insert("description".to_string(), PropValue::Text(description));
            }
        }

        insert_provenance(&mut props, self.provenance.as_ref());
        props
    }
}

impl Iterator for NodeStream<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return None;
        }

        while let Some(term) = self.candidates.next() {
            if let Some(key) = self.accept(term) {
                let properties = self.properties(&key);
                self.emitted += 1;
                return Some(Node::new(key, self.label.label, properties));
            }
        }

        if self.limit.is_some() {
            debug!(nodes = self.emitted, "Dry run finished");
        }
        None
    }
}

// ============================================================================
// Edge stream
// ============================================================================

type Pairs<'a> = Box<dyn Iterator<Item = (&'static str, &'a Term, &'a Term)> + 'a>;

pub struct EdgeStream<'a> {
    rule: &'static EdgeRule,
    cache: &'a PredicateCache,
    classifier: Option<&'a SubontologyClassifier>,
    resolver: RestrictionResolver<'a>,
    contexts: Vec<&'static str>,
    pairs: Pairs<'a>,
    write_properties: bool,
    provenance: Option<(String, String)>,
    emitted: usize,
    limit: Option<usize>,
}

impl EdgeStream<'_> {
    /// Turn one triple into `(source key, target key, relation)`, or skip it
    fn edge(&self, predicate: &str, subject: &Term, object: &Term) -> Option<(String, String, RelType)> {
        let source_iri = subject.as_iri()?;
        if !self.rule.source_allowed(source_iri) {
            return None;
        }

        let source = to_key(source_iri);
        if self.cache.is_deprecated(&source) {
            return None;
        }

        if let Some(partition) = self.rule.partition {
            if self.classifier.and_then(|c| c.classify(&source)) != Some(partition) {
                return None;
            }
        }

        let (rel, target) = match object {
            Term::Literal(literal) => {
                if predicate != vocab::OBO_IN_OWL_DB_XREF || !self.rule.accepts(RelType::Dbxref) {
                    return None;
                }
                let target = self.xref_target(source_iri, &source, literal.value())?;
                return Some((source, target, RelType::Dbxref));
            },
            Term::NamedNode(_) if predicate == vocab::OBO_IN_OWL_DB_XREF => {
                debug!(subject = %source, object = %object, "Ignoring non-literal xref");
                return None;
            },
            Term::NamedNode(_) => (RelType::from_predicate(predicate)?, object.clone()),
            Term::BlankNode(_) => {
                let (context, target) = self.resolver.resolve_any(object, &self.contexts)?;
                (RelType::from_predicate(context)?, target)
            },
        };

        if !self.rule.accepts(rel) {
            return None;
        }

        let target_iri = target.as_iri()?;
        if !self.rule.target_allowed(target_iri) {
            return None;
        }

        let target = to_key(target_iri);
        if self.cache.is_deprecated(&target) {
            return None;
        }

        Some((source, target, rel))
    }

    fn xref_target(&self, subject_iri: &str, source: &str, literal: &str) -> Option<String> {
        if literal == subject_iri {
            debug!(subject = %source, "Skipping self xref");
            return None;
        }

        let Some(target) = xref_key(literal) else {
            debug!(subject = %source, xref = literal, "Unsupported xref format");
            return None;
        };

        if target == source {
            debug!(subject = %source, "Skipping self xref");
            return None;
        }

        Some(target)
    }

    fn properties(&self, rel: RelType) -> Properties {
        let mut props = Properties::new();
        if self.write_properties {
            props.insert("rel_type".to_string(), PropValue::Text(rel.name().to_string()));
            insert_provenance(&mut props, self.provenance.as_ref());
        }
        props
    }
}

impl Iterator for EdgeStream<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return None;
        }

        while let Some((predicate, subject, object)) = self.pairs.next() {
            if let Some((source, target, rel)) = self.edge(predicate, subject, object) {
                self.emitted += 1;
                return Some(Edge::new(source, target, self.rule.label, self.properties(rel)));
            }
        }

        None
    }
}

fn insert_provenance(props: &mut Properties, provenance: Option<&(String, String)>) {
    if let Some((source, source_url)) = provenance {
        props.insert("source".to_string(), PropValue::Text(source.clone()));
        props.insert("source_url".to_string(), PropValue::Text(source_url.clone()));
    }
}
