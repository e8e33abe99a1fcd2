//! ragate CLI entrypoint.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use ragate::cache::CachedEmbedder;
use ragate::config::Config;
use ragate::embedding::SentenceEmbedder;
use ragate::fallback::WikipediaSource;
use ragate::generation::{GenaiGenerator, Generator};
use ragate::pipeline::RagPipeline;
use ragate::vectordb::QdrantIndex;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Answer questions from your documents, falling back to Wikipedia when retrieval is weak
#[derive(Parser, Debug)]
#[command(name = "ragate", version, about, long_about = None)]
struct Cli {
    /// Check that Qdrant is reachable and exit (0 healthy, 1 otherwise)
    #[arg(long)]
    health_check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk, embed and index a plain-text file
    Ingest {
        /// Source id recorded as provenance (defaults to the file name)
        #[arg(long)]
        source: Option<String>,

        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Ask a question against the indexed corpus
    Ask {
        /// Print the full answer record as JSON
        #[arg(long)]
        json: bool,

        #[arg(value_name = "QUESTION", required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    if cli.health_check {
        std::process::exit(run_health_check(&config).await);
    }

    let Some(command) = cli.command else {
        bail!("no command given (try `ragate --help`)");
    };

    config.validate()?;

    if config.mock_provider {
        #[cfg(feature = "mock")]
        {
            tracing::warn!("RAGATE_MOCK_PROVIDER set, answering with the offline mock generator");
            return run(command, &config, ragate::generation::MockGenerator::new()).await;
        }
        #[cfg(not(feature = "mock"))]
        bail!("RAGATE_MOCK_PROVIDER requires a build with the `mock` feature");
    }

    let generator = GenaiGenerator::new(&config.model)?;
    run(command, &config, generator).await
}

async fn run<G: Generator>(command: Command, config: &Config, generator: G) -> anyhow::Result<()> {
    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection_name,
        model = %config.model,
        "ragate starting"
    );

    let index = QdrantIndex::new(&config.qdrant_url, &config.collection_name)?;

    let embedder_config = config.embedder_config();
    if embedder_config.is_stub() {
        tracing::warn!("No RAGATE_EMBEDDER_PATH configured, running embedder in stub mode");
    }
    let embedder = CachedEmbedder::with_capacity(
        SentenceEmbedder::load(embedder_config)?,
        config.embedding_cache_capacity,
    );

    let fallback = WikipediaSource::new(config.wikipedia_config())?;

    let pipeline = RagPipeline::from_config(config, index, embedder, fallback, generator)?;

    match command {
        Command::Ingest { source, file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let source_id = match source {
                Some(source) => source,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("cannot derive a source id from the path; pass --source")?,
            };

            let stored = pipeline.ingest(&source_id, &text).await?;
            println!("Ingested {stored} chunk(s) from {source_id}");
        }
        Command::Ask { json, question } => {
            let question = question.join(" ");
            pipeline.ensure_collection().await?;
            let answer = pipeline.ask(&question).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.answer);
                println!();
                println!("decision: {}", answer.effective_decision);
                for (_, provenance) in answer.context.iter() {
                    println!("  - {} ({})", provenance.source_id, provenance.origin.as_str());
                }
            }
        }
    }

    Ok(())
}

async fn run_health_check(config: &Config) -> i32 {
    let index = match QdrantIndex::new(&config.qdrant_url, &config.collection_name) {
        Ok(index) => index,
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            return 1;
        }
    };

    match index.health_check().await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            1
        }
    }
}
