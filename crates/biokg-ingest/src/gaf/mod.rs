// GO annotation (GAF 2.x) adapter
//
// Turns gene product annotations into edges from the annotated object to its
// GO term, one label per subontology:
//
//   UniProtKB  A0A024RBG1  NUDT4B  located_in  GO:0005829  GO_REF:0000052  IDA  ...  C  ...
//   -> (A0A024RBG1, GO:0005829, cellular_component_gene_product_located_in, {...})
//
// Format reference: https://geneontology.github.io/docs/go-annotation-file-gaf-format-2.2/

use crate::ontology::profile::{BIOLOGICAL_PROCESS, CELLULAR_COMPONENT, MOLECULAR_FUNCTION};
use crate::ontology::SubontologyClassifier;
use biokg_common::{Edge, PropValue, Properties};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type Result<T> = std::result::Result<T, GafError>;

/// Error types for annotation ingestion
#[derive(Debug, thiserror::Error)]
pub enum GafError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Annotation file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown annotation source '{0}' (expected human, human_isoform or rna)")]
    UnknownSource(String),

    #[error("Invalid annotation label '{0}'")]
    InvalidLabel(String),
}

/// Columns required by GAF 2.x
pub const GAF_COLUMNS: usize = 15;

const DB_OBJECT_ID: usize = 1;
const QUALIFIER: usize = 3;
const GO_ID: usize = 4;
const DB_REFERENCE: usize = 5;
const EVIDENCE: usize = 6;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Published annotation sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GafSource {
    #[default]
    Human,
    HumanIsoform,
    Rna,
}

impl GafSource {
    pub fn url(self) -> &'static str {
        match self {
            GafSource::Human => "http://geneontology.org/gene-associations/goa_human.gaf.gz",
            GafSource::HumanIsoform => {
                "http://geneontology.org/gene-associations/goa_human_isoform.gaf.gz"
            },
            GafSource::Rna => "http://geneontology.org/gene-associations/goa_human_rna.gaf.gz",
        }
    }
}

impl std::str::FromStr for GafSource {
    type Err = GafError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(GafSource::Human),
            "human_isoform" => Ok(GafSource::HumanIsoform),
            "rna" => Ok(GafSource::Rna),
            other => Err(GafError::UnknownSource(other.to_string())),
        }
    }
}

/// Edge labels and what they select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GafLabel {
    MolecularFunction,
    BiologicalProcess,
    /// Cellular component, `part_of` or `located_in`
    CellularComponent,
    CellularComponentPartOf,
    CellularComponentLocatedIn,
}

impl GafLabel {
    pub const ALL: [GafLabel; 5] = [
        GafLabel::MolecularFunction,
        GafLabel::BiologicalProcess,
        GafLabel::CellularComponent,
        GafLabel::CellularComponentPartOf,
        GafLabel::CellularComponentLocatedIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GafLabel::MolecularFunction => "molecular_function_gene_product",
            GafLabel::BiologicalProcess => "biological_process_gene_product",
            GafLabel::CellularComponent => "cellular_component_gene_product",
            GafLabel::CellularComponentPartOf => "cellular_component_gene_product_part_of",
            GafLabel::CellularComponentLocatedIn => "cellular_component_gene_product_located_in",
        }
    }

    pub fn subontology(self) -> &'static str {
        match self {
            GafLabel::MolecularFunction => MOLECULAR_FUNCTION,
            GafLabel::BiologicalProcess => BIOLOGICAL_PROCESS,
            _ => CELLULAR_COMPONENT,
        }
    }

    /// Qualifier filter; only cellular component labels have one
    pub fn accepts_qualifier(self, qualifier: &str) -> bool {
        let part_of = qualifier.contains("part_of");
        let located_in = qualifier.contains("located_in");
        match self {
            GafLabel::MolecularFunction | GafLabel::BiologicalProcess => true,
            GafLabel::CellularComponent => part_of || located_in,
            GafLabel::CellularComponentPartOf => part_of,
            GafLabel::CellularComponentLocatedIn => located_in && !part_of,
        }
    }
}

impl std::str::FromStr for GafLabel {
    type Err = GafError;

    fn from_str(s: &str) -> Result<Self> {
        GafLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| GafError::InvalidLabel(s.to_string()))
    }
}

/// Configuration for one annotation adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GafConfig {
    /// Annotation file, gzipped or plain
    pub path: PathBuf,
    pub source: GafSource,
    pub label: String,
    pub write_properties: bool,
    pub add_provenance: bool,
    /// RNAcentral → transcript id mapping (required for `rna`)
    pub id_mapping: Option<PathBuf>,
}

impl GafConfig {
    pub fn new(path: impl Into<PathBuf>, source: GafSource, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source,
            label: label.into(),
            write_properties: true,
            add_provenance: true,
            id_mapping: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(GafError::Config("Annotation file path cannot be empty".to_string()));
        }
        if self.source == GafSource::Rna && self.id_mapping.is_none() {
            return Err(GafError::Config(
                "RNA annotations need an RNAcentral id mapping file".to_string(),
            ));
        }
        self.label.parse::<GafLabel>()?;
        Ok(())
    }
}

/// Open a possibly gzipped file, sniffing the gzip magic bytes
pub fn open_maybe_gzip(path: &Path) -> Result<Box<dyn Read>> {
    let mut reader = BufReader::new(File::open(path)?);
    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if gzipped {
        debug!(path = %path.display(), "Reading gzip-compressed file");
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Load the RNAcentral id mapping: `URS_taxon` → transcript id.
///
/// Columns: RNAcentral id, database, external id, taxon, ...
pub fn load_id_mapping(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(open_maybe_gzip(path)?);

    let mut mapping = HashMap::new();
    for record in reader.records() {
        let record = record?;
        if let (Some(urs), Some(external), Some(taxon)) = (record.get(0), record.get(2), record.get(3)) {
            mapping.insert(format!("{}_{}", urs, taxon), external.to_string());
        }
    }

    info!(entries = mapping.len(), "Loaded RNAcentral id mapping");
    Ok(mapping)
}

pub struct GafAdapter {
    config: GafConfig,
    label: GafLabel,
    classifier: Option<Arc<SubontologyClassifier>>,
}

impl GafAdapter {
    pub fn new(config: GafConfig) -> Result<Self> {
        config.validate()?;
        let label = config.label.parse()?;
        Ok(Self {
            config,
            label,
            classifier: None,
        })
    }

    /// Filter GO terms by subontology. Without a classifier every term passes.
    pub fn with_classifier(mut self, classifier: Arc<SubontologyClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn label(&self) -> GafLabel {
        self.label
    }

    /// Open the annotation file and stream its edges
    pub fn edges(&self) -> Result<GafEdges> {
        if self.classifier.is_none() {
            warn!("No subontology mapping available; GO terms are not filtered by subontology");
        }

        let id_mapping = match (&self.config.id_mapping, self.config.source) {
            (Some(path), GafSource::Rna) => Some(load_id_mapping(path)?),
            _ => None,
        };

        let reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'!'))
            .flexible(true)
            .quoting(false)
            .from_reader(open_maybe_gzip(&self.config.path)?);

        info!(path = %self.config.path.display(), label = self.label.as_str(), "Reading annotations");

        Ok(GafEdges {
            records: reader.into_records(),
            label: self.label,
            classifier: self.classifier.clone(),
            id_mapping,
            provenance: (self.config.write_properties && self.config.add_provenance)
                .then(|| self.config.source.url()),
            write_properties: self.config.write_properties,
            seen: HashSet::new(),
            skipped: 0,
        })
    }
}

/// Single-pass annotation edge stream
pub struct GafEdges {
    records: StringRecordsIntoIter<Box<dyn Read>>,
    label: GafLabel,
    classifier: Option<Arc<SubontologyClassifier>>,
    id_mapping: Option<HashMap<String, String>>,
    provenance: Option<&'static str>,
    write_properties: bool,
    seen: HashSet<(String, String)>,
    skipped: usize,
}

impl GafEdges {
    fn edge(&mut self, record: &StringRecord) -> Option<Edge> {
        if record.len() < GAF_COLUMNS {
            self.skipped += 1;
            debug!(columns = record.len(), "Skipping short annotation row");
            return None;
        }

        let object_id = record.get(DB_OBJECT_ID)?.trim();
        let go_id = record.get(GO_ID)?.trim();
        let qualifier = record.get(QUALIFIER)?.trim();

        if let Some(classifier) = &self.classifier {
            if classifier.classify(go_id) != Some(self.label.subontology()) {
                return None;
            }
        }

        let source = match &self.id_mapping {
            Some(mapping) => mapping.get(object_id)?.clone(),
            None => object_id.to_string(),
        };

        if !self.label.accepts_qualifier(qualifier) {
            return None;
        }

        // Same (source, target) under this adapter's single label
        if !self.seen.insert((source.clone(), go_id.to_string())) {
            return None;
        }

        let mut props = Properties::new();
        if self.write_properties {
            props.insert("qualifier".to_string(), PropValue::from(qualifier));
            props.insert(
                "db_reference".to_string(),
                PropValue::from(record.get(DB_REFERENCE).unwrap_or_default()),
            );
            props.insert(
                "evidence".to_string(),
                PropValue::from(record.get(EVIDENCE).unwrap_or_default()),
            );
            props.insert(
                "negated".to_string(),
                PropValue::from(qualifier.contains("NOT").to_string()),
            );
            if let Some(url) = self.provenance {
                props.insert("source".to_string(), PropValue::from("GO"));
                props.insert("source_url".to_string(), PropValue::from(url));
            }
        }

        Some(Edge::new(source, go_id, self.label.as_str(), props))
    }
}

impl Iterator for GafEdges {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };

            if let Some(edge) = self.edge(&record) {
                return Some(Ok(edge));
            }
        }
    }
}

impl Drop for GafEdges {
    fn drop(&mut self) {
        if self.skipped > 0 {
            warn!(rows = self.skipped, "Skipped annotation rows with too few columns");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::rdf::{iri, literal, vocab, Graph, Statement};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const GAF: &str = "!gaf-version: 2.2\n\
!generated-by: GOC\n\
UniProtKB\tA0A024RBG1\tNUDT4B\tenables\tGO:0003723\tGO_REF:0000043\tIEA\tUniProtKB-KW:KW-0694\tF\tNUDT4B protein\tNUDT4B\tprotein\ttaxon:9606\t20230306\tUniProt\n\
UniProtKB\tA0A024RBG1\tNUDT4B\tenables\tGO:0003723\tGO_REF:0000043\tIEA\tUniProtKB-KW:KW-0694\tF\tNUDT4B protein\tNUDT4B\tprotein\ttaxon:9606\t20230306\tUniProt\n\
UniProtKB\tA0A024RBG1\tNUDT4B\tlocated_in\tGO:0005829\tGO_REF:0000052\tIDA\t\tC\tNUDT4B protein\tNUDT4B\tprotein\ttaxon:9606\t20161204\tHPA\n\
UniProtKB\tA0A075B6H7\tIGKV3-7\tNOT|part_of\tGO:0005886\tGO_REF:0000044\tIEA\t\tC\tIGKV3-7 protein\tIGKV3-7\tprotein\ttaxon:9606\t20230306\tUniProt\n\
UniProtKB\tA0A075B6H7\tIGKV3-7\tinvolved_in\tGO:0002250\tGO_REF:0000043\tIEA\n";

    fn write_gaf(dir: &Path, gzip: bool) -> PathBuf {
        let path = dir.join(if gzip { "goa.gaf.gz" } else { "goa.gaf" });
        let file = File::create(&path).unwrap();
        if gzip {
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(GAF.as_bytes()).unwrap();
            encoder.finish().unwrap();
        } else {
            let mut file = file;
            file.write_all(GAF.as_bytes()).unwrap();
        }
        path
    }

    fn classifier() -> Arc<SubontologyClassifier> {
        let mut graph = Graph::new();
        for (id, namespace) in [
            ("0003723", MOLECULAR_FUNCTION),
            ("0005829", CELLULAR_COMPONENT),
            ("0005886", CELLULAR_COMPONENT),
            ("0002250", BIOLOGICAL_PROCESS),
        ] {
            graph.insert(Statement::new(
                iri(format!("http://purl.obolibrary.org/obo/GO_{}", id)),
                vocab::OBO_IN_OWL_NAMESPACE,
                literal(namespace),
            ));
        }
        Arc::new(SubontologyClassifier::build(
            "go",
            &graph,
            &[BIOLOGICAL_PROCESS, MOLECULAR_FUNCTION, CELLULAR_COMPONENT],
        ))
    }

    fn edges(path: &Path, label: GafLabel) -> Vec<Edge> {
        GafAdapter::new(GafConfig::new(path, GafSource::Human, label.as_str()))
            .unwrap()
            .with_classifier(classifier())
            .edges()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_duplicate_annotations_yield_one_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gaf(dir.path(), false);

        let edges = edges(&path, GafLabel::MolecularFunction);
        assert_eq!(edges.len(), 1);
        assert_eq!(
            edges[0].identity(),
            ("A0A024RBG1", "GO:0003723", "molecular_function_gene_product")
        );
        assert_eq!(edges[0].properties["evidence"], PropValue::from("IEA"));
        assert_eq!(edges[0].properties["negated"], PropValue::from("false"));
        assert_eq!(edges[0].properties["source"], PropValue::from("GO"));
    }

    #[test]
    fn test_gzip_input_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gaf(dir.path(), true);

        assert_eq!(edges(&path, GafLabel::MolecularFunction).len(), 1);
    }

    #[test]
    fn test_cellular_component_qualifier_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gaf(dir.path(), false);

        let located = edges(&path, GafLabel::CellularComponentLocatedIn);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].target, "GO:0005829");

        let part_of = edges(&path, GafLabel::CellularComponentPartOf);
        assert_eq!(part_of.len(), 1);
        assert_eq!(part_of[0].source, "A0A075B6H7");
        assert_eq!(part_of[0].properties["negated"], PropValue::from("true"));

        assert_eq!(edges(&path, GafLabel::CellularComponent).len(), 2);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gaf(dir.path(), false);

        // The only biological_process row has too few columns
        assert!(edges(&path, GafLabel::BiologicalProcess).is_empty());
    }

    #[test]
    fn test_rna_ids_are_remapped() {
        let dir = tempfile::tempdir().unwrap();
        let gaf = dir.path().join("rna.gaf");
        std::fs::write(
            &gaf,
            "RNAcentral\tURS0000000055_9606\tx\tenables\tGO:0003723\tPMID:1\tIDA\t\tF\tx\tx\tncRNA\ttaxon:9606\t20230306\tRNAcentral\n",
        )
        .unwrap();
        let mapping = dir.path().join("ensembl_gencode.tsv");
        std::fs::write(&mapping, "URS0000000055\tENSEMBL_GENCODE\tENST00000585414\t9606\tlncRNA\tENSG00000226803.9\n")
            .unwrap();

        let mut config = GafConfig::new(&gaf, GafSource::Rna, "molecular_function_gene_product");
        config.id_mapping = Some(mapping);
        let edges: Vec<Edge> = GafAdapter::new(config)
            .unwrap()
            .edges()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "ENST00000585414");
    }

    #[test]
    fn test_config_validation() {
        let config = GafConfig::new("goa.gaf", GafSource::Human, "gene_product");
        assert!(matches!(GafAdapter::new(config), Err(GafError::InvalidLabel(_))));

        let config = GafConfig::new("rna.gaf", GafSource::Rna, "molecular_function_gene_product");
        assert!(matches!(GafAdapter::new(config), Err(GafError::Config(_))));

        assert!(matches!("mouse".parse::<GafSource>(), Err(GafError::UnknownSource(_))));
    }
}
