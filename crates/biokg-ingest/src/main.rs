//! BioKG Ingest - ontology and annotation ingestion tool
//!
//! Writes graph tuples as JSON lines to stdout (or `--output`); logs go to
//! stderr.

use anyhow::{Context, Result};
use biokg_common::logging::{init_logging, LogConfig, LogLevel};
use biokg_ingest::context::IngestContext;
use biokg_ingest::gaf::{GafAdapter, GafConfig, GafLabel, GafSource};
use biokg_ingest::ontology::{
    AdapterConfig, FetchConfig, Mode, OntologyAdapter, OntologyFetcher, SubontologyClassifier,
};
use biokg_ingest::registry::AdapterKind;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_jsonlines::JsonLinesWriter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "biokg-ingest")]
#[command(author, version, about = "Ontology and annotation ingestion into graph tuples")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output file (JSON lines); stdout when omitted
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emit ontology terms
    Nodes(OntologyArgs),

    /// Emit ontology relations
    Edges(OntologyArgs),

    /// Emit gene product → GO term edges from an annotation file
    Annotations {
        /// GAF file, gzipped or plain
        #[arg(short, long)]
        file: PathBuf,

        /// Annotation set: human, human_isoform, rna
        #[arg(short, long, default_value = "human")]
        source: String,

        /// Edge label, e.g. molecular_function_gene_product
        #[arg(short, long)]
        label: String,

        /// RNAcentral id mapping (rna annotations)
        #[arg(long)]
        id_mapping: Option<PathBuf>,

        /// Directory holding the GO subontology mapping
        #[arg(long, env = "BIOKG_CACHE_DIR")]
        cache_dir: Option<PathBuf>,

        /// Omit edge properties
        #[arg(long)]
        no_properties: bool,

        /// Omit source / source_url
        #[arg(long)]
        no_provenance: bool,
    },

    /// Report whether cached ontologies are out of date
    CheckUpdates {
        /// Adapter keys; all ontologies when omitted
        adapters: Vec<String>,

        #[arg(long, env = "BIOKG_CACHE_DIR")]
        cache_dir: Option<PathBuf>,
    },

    /// List adapters and their labels
    List,
}

#[derive(Args, Debug)]
struct OntologyArgs {
    /// Adapter key (gene_ontology, cell_ontology, uberon, human_phenotype_ontology)
    #[arg(short, long)]
    adapter: String,

    /// Output label
    #[arg(short, long)]
    label: String,

    /// Cache directory for documents and subontology mappings
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Cache expiration window in days
    #[arg(long)]
    cache_expiration_days: Option<i64>,

    /// Override the document URL (URL, file:// URL or path)
    #[arg(long)]
    source_url: Option<String>,

    /// Emit at most 100 tuples
    #[arg(long)]
    dry_run: bool,

    /// Attach term definitions
    #[arg(long)]
    description: bool,

    /// Omit tuple properties
    #[arg(long)]
    no_properties: bool,

    /// Omit source / source_url
    #[arg(long)]
    no_provenance: bool,
}

impl OntologyArgs {
    fn adapter(&self, mode: Mode) -> Result<OntologyAdapter> {
        let mut builder = AdapterConfig::from_env()?.mode(mode).label(self.label.clone());

        if let Some(dir) = &self.cache_dir {
            builder = builder.cache_dir(dir.clone());
        }
        if let Some(days) = self.cache_expiration_days {
            builder = builder.cache_expiration_days(days);
        }
        if let Some(url) = &self.source_url {
            builder = builder.source_url(url.clone());
        }
        if self.dry_run {
            builder = builder.dry_run(true);
        }
        if self.description {
            builder = builder.add_description(true);
        }
        if self.no_properties {
            builder = builder.write_properties(false);
        }
        if self.no_provenance {
            builder = builder.add_provenance(false);
        }

        Ok(AdapterKind::from_key(&self.adapter)?.ontology_adapter(builder)?)
    }
}

fn sink(output: Option<&PathBuf>) -> Result<JsonLinesWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    Ok(JsonLinesWriter::new(writer))
}

async fn run_ontology(args: OntologyArgs, mode: Mode, output: Option<&PathBuf>) -> Result<()> {
    let mut adapter = args.adapter(mode)?;
    let mut ctx = IngestContext::new(FetchConfig::from_adapter(adapter.config()))?;
    adapter.load(&mut ctx).await?;

    let mut writer = sink(output)?;
    let mut count = 0usize;
    match mode {
        Mode::Node => {
            for node in adapter.nodes()? {
                writer.write(&node)?;
                count += 1;
            }
        },
        Mode::Edge => {
            for edge in adapter.edges()? {
                writer.write(&edge)?;
                count += 1;
            }
        },
    }
    writer.flush()?;

    info!(
        ontology = adapter.profile().id,
        label = %args.label,
        %mode,
        count,
        "Extraction complete"
    );
    Ok(())
}

#[derive(Serialize)]
struct AdapterListing {
    adapter: &'static str,
    ontology: Option<&'static str>,
    node_labels: Vec<&'static str>,
    edge_labels: Vec<&'static str>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("biokg-ingest")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    let output = cli.output.as_ref();
    match cli.command {
        Command::Nodes(args) => run_ontology(args, Mode::Node, output).await?,
        Command::Edges(args) => run_ontology(args, Mode::Edge, output).await?,
        Command::Annotations {
            file,
            source,
            label,
            id_mapping,
            cache_dir,
            no_properties,
            no_provenance,
        } => {
            let source: GafSource = source.parse()?;
            let mut config = GafConfig::new(file, source, label);
            config.id_mapping = id_mapping;
            config.write_properties = !no_properties;
            config.add_provenance = !no_provenance;

            let mut adapter = GafAdapter::new(config)?;
            match cache_dir.filter(|dir| SubontologyClassifier::mapping_path(dir, "go").exists()) {
                Some(dir) => {
                    let classifier = SubontologyClassifier::load(&dir, "go")?;
                    adapter = adapter.with_classifier(Arc::new(classifier));
                },
                None => info!("No GO subontology mapping in the cache dir; load `nodes -a go` with --cache-dir to create one"),
            }

            let mut writer = sink(output)?;
            let mut count = 0usize;
            for edge in adapter.edges()? {
                writer.write(&edge?)?;
                count += 1;
            }
            writer.flush()?;
            info!(label = adapter.label().as_str(), count, "Annotation extraction complete");
        },
        Command::CheckUpdates {
            adapters,
            cache_dir,
        } => {
            let kinds = if adapters.is_empty() {
                AdapterKind::ALL.to_vec()
            } else {
                adapters
                    .iter()
                    .map(|key| AdapterKind::from_key(key))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };

            let mut builder = AdapterConfig::from_env()?;
            if let Some(dir) = cache_dir {
                builder = builder.cache_dir(dir);
            }
            let fetcher = OntologyFetcher::new(FetchConfig::from_adapter(&builder.build()))?;

            let mut writer = sink(output)?;
            for profile in kinds.into_iter().filter_map(AdapterKind::profile) {
                let status = fetcher.check_for_updates(profile.id, profile.url).await?;
                writer.write(&status)?;
            }
            writer.flush()?;
        },
        Command::List => {
            let mut writer = sink(output)?;
            for kind in AdapterKind::ALL {
                let profile = kind.profile();
                let listing = AdapterListing {
                    adapter: kind.key(),
                    ontology: kind.ontology_id(),
                    node_labels: profile.map(|p| p.labels(Mode::Node)).unwrap_or_default(),
                    edge_labels: match profile {
                        Some(p) => p.labels(Mode::Edge),
                        None => GafLabel::ALL
                            .iter()
                            .map(|label| label.as_str())
                            .collect(),
                    },
                };
                writer.write(&listing)?;
            }
            writer.flush()?;
        },
    }

    Ok(())
}
