// Subontology classifier
//
// One GO document carries three disjoint subontologies, tagged per term with
// `oboInOwl:hasOBONamespace`. The term → subontology mapping is persisted
// next to the cached document and rebuilt when the document is newer.

use super::fetch::CacheMeta;
use super::key::to_key;
use super::Result;
use crate::rdf::{vocab, Graph, Term, TermExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Contents of `<id>_subontology_meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingMeta {
    pub date: DateTime<Utc>,
    pub source_version: String,
    pub entries: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SubontologyClassifier {
    ontology: String,
    mapping: BTreeMap<String, String>,
}

impl SubontologyClassifier {
    /// Classify every live term of `graph` that is tagged with one of
    /// `partitions`.
    pub fn build(ontology: &str, graph: &Graph, partitions: &[&str]) -> Self {
        let mut mapping = BTreeMap::new();

        for (subject, namespace) in graph.subject_objects(vocab::OBO_IN_OWL_NAMESPACE) {
            if !subject.is_named_node() || is_deprecated(graph, subject) || is_restriction(graph, subject) {
                continue;
            }

            let namespace = namespace.lexical();
            if partitions.contains(&namespace) {
                mapping
                    .entry(to_key(subject.lexical()))
                    .or_insert_with(|| namespace.to_string());
            }
        }

        info!(ontology, entries = mapping.len(), "Built subontology mapping");
        Self {
            ontology: ontology.to_string(),
            mapping,
        }
    }

    pub fn classify(&self, key: &str) -> Option<&str> {
        self.mapping.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn ontology(&self) -> &str {
        &self.ontology
    }

    pub fn mapping_path(dir: &Path, ontology: &str) -> PathBuf {
        dir.join(format!("{}_subontology_mapping.json", ontology))
    }

    pub fn meta_path(dir: &Path, ontology: &str) -> PathBuf {
        dir.join(format!("{}_subontology_meta.json", ontology))
    }

    /// Write the mapping and its metadata into `dir`
    pub fn persist(&self, dir: &Path, source_version: &str) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let mapping_path = Self::mapping_path(dir, &self.ontology);
        std::fs::write(&mapping_path, serde_json::to_string(&self.mapping)?)?;

        let meta = MappingMeta {
            date: Utc::now(),
            source_version: source_version.to_string(),
            entries: self.mapping.len(),
        };
        std::fs::write(
            Self::meta_path(dir, &self.ontology),
            serde_json::to_string_pretty(&meta)?,
        )?;

        debug!(path = %mapping_path.display(), entries = meta.entries, "Persisted subontology mapping");
        Ok(())
    }

    pub fn load(dir: &Path, ontology: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Self::mapping_path(dir, ontology))?;
        let mapping = serde_json::from_str(&content)?;
        Ok(Self {
            ontology: ontology.to_string(),
            mapping,
        })
    }

    /// True when the persisted mapping is missing, unreadable, or older than
    /// the ontology document it was built from.
    pub fn should_rebuild(dir: &Path, ontology: &str, ontology_meta: Option<&CacheMeta>) -> bool {
        if !Self::mapping_path(dir, ontology).exists() {
            return true;
        }

        let Some(ontology_meta) = ontology_meta else {
            return true;
        };

        let meta = std::fs::read_to_string(Self::meta_path(dir, ontology))
            .ok()
            .and_then(|content| serde_json::from_str::<MappingMeta>(&content).ok());

        match meta {
            Some(meta) => meta.date < ontology_meta.date,
            None => true,
        }
    }

    /// Load the persisted mapping, rebuilding (and persisting) it when stale.
    ///
    /// Without a directory the mapping is built in memory only.
    pub fn load_or_build(
        ontology: &str,
        dir: Option<&Path>,
        graph: &Graph,
        partitions: &[&str],
        ontology_meta: Option<&CacheMeta>,
        source_version: &str,
    ) -> Result<Self> {
        let Some(dir) = dir else {
            return Ok(Self::build(ontology, graph, partitions));
        };

        if !Self::should_rebuild(dir, ontology, ontology_meta) {
            match Self::load(dir, ontology) {
                Ok(classifier) => {
                    debug!(ontology, entries = classifier.len(), "Loaded subontology mapping");
                    return Ok(classifier);
                },
                Err(e) => warn!(ontology, error = %e, "Unreadable subontology mapping; rebuilding"),
            }
        }

        let classifier = Self::build(ontology, graph, partitions);
        classifier.persist(dir, source_version)?;
        Ok(classifier)
    }
}

fn is_deprecated(graph: &Graph, node: &Term) -> bool {
    graph
        .objects(node, vocab::OWL_DEPRECATED)
        .any(|t| t.lexical().trim().eq_ignore_ascii_case("true"))
}

fn is_restriction(graph: &Graph, node: &Term) -> bool {
    graph
        .objects(node, vocab::RDF_TYPE)
        .any(|t| t.is(vocab::OWL_RESTRICTION))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::rdf::{iri, literal, Statement};
    use chrono::Duration;

    const PARTITIONS: &[&str] = &["biological_process", "molecular_function", "cellular_component"];

    fn go(id: &str) -> Term {
        iri(format!("http://purl.obolibrary.org/obo/GO_{}", id))
    }

    fn graph() -> Graph {
        let mut graph = Graph::new();
        for (id, namespace) in [
            ("0008150", "biological_process"),
            ("0003674", "molecular_function"),
            ("0005575", "cellular_component"),
            ("0000001", "biological_process"),
            ("0000002", "external"),
        ] {
            graph.insert(Statement::new(go(id), vocab::OBO_IN_OWL_NAMESPACE, literal(namespace)));
        }
        graph.insert(Statement::new(go("0000001"), vocab::OWL_DEPRECATED, literal("true")));
        graph
    }

    fn ontology_meta(date: DateTime<Utc>) -> CacheMeta {
        CacheMeta {
            date,
            url: "http://purl.obolibrary.org/obo/go.owl".to_string(),
            hash: String::new(),
            version: "2025-03-16".to_string(),
        }
    }

    #[test]
    fn test_build_and_classify() {
        let classifier = SubontologyClassifier::build("go", &graph(), PARTITIONS);

        assert_eq!(classifier.classify("GO:0008150"), Some("biological_process"));
        assert_eq!(classifier.classify("GO:0005575"), Some("cellular_component"));
        assert_eq!(classifier.classify("GO:0000001"), None, "deprecated");
        assert_eq!(classifier.classify("GO:0000002"), None, "unknown namespace");
        assert_eq!(classifier.len(), 3);
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = SubontologyClassifier::build("go", &graph(), PARTITIONS);
        classifier.persist(dir.path(), "2025-03-16").unwrap();

        let loaded = SubontologyClassifier::load(dir.path(), "go").unwrap();
        assert_eq!(loaded.classify("GO:0003674"), Some("molecular_function"));
        assert_eq!(loaded.len(), classifier.len());
    }

    #[test]
    fn test_should_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let older = ontology_meta(Utc::now() - Duration::days(1));

        assert!(SubontologyClassifier::should_rebuild(dir.path(), "go", Some(&older)));

        SubontologyClassifier::build("go", &graph(), PARTITIONS)
            .persist(dir.path(), "2025-03-16")
            .unwrap();
        assert!(!SubontologyClassifier::should_rebuild(dir.path(), "go", Some(&older)));
        assert!(SubontologyClassifier::should_rebuild(dir.path(), "go", None));

        let newer = ontology_meta(Utc::now() + Duration::days(1));
        assert!(SubontologyClassifier::should_rebuild(dir.path(), "go", Some(&newer)));

        std::fs::remove_file(SubontologyClassifier::meta_path(dir.path(), "go")).unwrap();
        assert!(SubontologyClassifier::should_rebuild(dir.path(), "go", Some(&older)));
    }

    #[test]
    fn test_load_or_build_persists() {
        let dir = tempfile::tempdir().unwrap();
        let meta = ontology_meta(Utc::now() - Duration::days(1));

        let built = SubontologyClassifier::load_or_build(
            "go",
            Some(dir.path()),
            &graph(),
            PARTITIONS,
            Some(&meta),
            "2025-03-16",
        )
        .unwrap();
        assert!(SubontologyClassifier::mapping_path(dir.path(), "go").exists());

        // Second call reads the file even with an empty graph
        let loaded = SubontologyClassifier::load_or_build(
            "go",
            Some(dir.path()),
            &Graph::new(),
            PARTITIONS,
            Some(&meta),
            "2025-03-16",
        )
        .unwrap();
        assert_eq!(loaded.len(), built.len());
    }
}
