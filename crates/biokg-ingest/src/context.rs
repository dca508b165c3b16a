//! Shared state for one ingestion run
//!
//! Holds the document fetcher and the subontology classifiers, so that
//! several adapters over the same ontology (one per GO partition, say) share
//! one mapping. Classifiers are rebuilt when the document version changes,
//! and always when the version is unknown: two unversioned documents cannot
//! be told apart.

use crate::ontology::fetch::{FetchConfig, OntologyFetcher};
use crate::ontology::profile::OntologyProfile;
use crate::ontology::subontology::SubontologyClassifier;
use crate::ontology::version;
use crate::ontology::Result;
use crate::rdf::Graph;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct IngestContext {
    fetcher: OntologyFetcher,
    classifiers: HashMap<String, (String, Arc<SubontologyClassifier>)>,
}

impl IngestContext {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: OntologyFetcher::new(config)?,
            classifiers: HashMap::new(),
        })
    }

    pub fn fetcher(&self) -> &OntologyFetcher {
        &self.fetcher
    }

    /// Classifier for a partitioned ontology at `version`.
    ///
    /// Reuses the in-memory mapping when a known version is unchanged,
    /// otherwise loads or rebuilds the persisted one. An unknown version
    /// always rebuilds from `graph`.
    pub fn classifier(
        &mut self,
        profile: &OntologyProfile,
        graph: &Graph,
        version: &str,
    ) -> Result<Arc<SubontologyClassifier>> {
        let known = version::is_known(version);

        if let Some((built_for, classifier)) = self.classifiers.get(profile.id) {
            if known && built_for == version {
                debug!(ontology = profile.id, version, "Reusing subontology mapping");
                return Ok(Arc::clone(classifier));
            }
        }

        // Without ontology metadata the persisted mapping counts as stale
        let meta = if known {
            self.fetcher.cached_meta(profile.id)
        } else {
            None
        };
        let classifier = Arc::new(SubontologyClassifier::load_or_build(
            profile.id,
            self.fetcher.config().cache_dir.as_deref(),
            graph,
            profile.partitions,
            meta.as_ref(),
            version,
        )?);

        self.classifiers.insert(
            profile.id.to_string(),
            (version.to_string(), Arc::clone(&classifier)),
        );
        Ok(classifier)
    }

    /// Drop every held classifier
    pub fn clear(&mut self) {
        self.classifiers.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ontology::profile;
    use crate::ontology::version::UNKNOWN_VERSION;
    use crate::rdf::{iri, literal, vocab, Statement};

    fn graph_with(id: &str, namespace: &str) -> Graph {
        let mut graph = Graph::new();
        graph.insert(Statement::new(
            iri(format!("http://purl.obolibrary.org/obo/GO_{}", id)),
            vocab::OBO_IN_OWL_NAMESPACE,
            literal(namespace),
        ));
        graph
    }

    fn go_graph() -> Graph {
        graph_with("0008150", "biological_process")
    }

    #[test]
    fn test_classifier_is_shared_per_version() {
        let mut ctx = IngestContext::new(FetchConfig::default()).unwrap();
        let go = profile::find("go").unwrap();

        let first = ctx.classifier(go, &go_graph(), "2025-03-16").unwrap();
        let second = ctx.classifier(go, &Graph::new(), "2025-03-16").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let rebuilt = ctx.classifier(go, &Graph::new(), "2025-04-01").unwrap();
        assert!(rebuilt.is_empty());

        ctx.clear();
        let fresh = ctx.classifier(go, &go_graph(), "2025-04-01").unwrap();
        assert_eq!(fresh.classify("GO:0008150"), Some("biological_process"));
    }

    #[test]
    fn test_unknown_versions_are_never_shared() {
        let mut ctx = IngestContext::new(FetchConfig::default()).unwrap();
        let go = profile::find("go").unwrap();

        let first = ctx.classifier(go, &go_graph(), UNKNOWN_VERSION).unwrap();
        assert_eq!(first.classify("GO:0008150"), Some("biological_process"));

        let second = ctx
            .classifier(go, &graph_with("0003674", "molecular_function"), UNKNOWN_VERSION)
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.classify("GO:0008150"), None);
        assert_eq!(second.classify("GO:0003674"), Some("molecular_function"));
    }

    #[test]
    fn test_unknown_version_ignores_persisted_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let config = FetchConfig {
            cache_dir: Some(dir.path().to_path_buf()),
            ..FetchConfig::default()
        };

        let mut ctx = IngestContext::new(config.clone()).unwrap();
        let go = profile::find("go").unwrap();
        ctx.classifier(go, &go_graph(), UNKNOWN_VERSION).unwrap();

        let mut ctx = IngestContext::new(config).unwrap();
        let rebuilt = ctx
            .classifier(go, &graph_with("0005575", "cellular_component"), UNKNOWN_VERSION)
            .unwrap();
        assert_eq!(rebuilt.classify("GO:0008150"), None);
        assert_eq!(rebuilt.classify("GO:0005575"), Some("cellular_component"));
    }
}
