use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use hybrid_client::{
    ClientConfig, ControlClient, DocMetadata, EmbedClient, InputType, QueryRequest, VectorRecord,
    EMBED_DIMENSION,
};
use hybrid_core::corpus::{demo_essays, Document};
use hybrid_core::encoder::{Bm25Encoder, Bm25Params};
use hybrid_core::persist::{load_encoder, save_encoder, StatePaths};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Fit the sparse encoder and drive the hybrid vector index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the sparse encoder on a corpus and persist the fitted state
    Fit {
        /// Corpus path (JSON/JSONL file or directory); built-in demo essays when omitted
        #[arg(long)]
        input: Option<String>,
        /// Fitted state directory
        #[arg(long, default_value = "./state")]
        state: String,
        /// Term frequency saturation parameter
        #[arg(long, default_value_t = 1.2)]
        k1: f32,
        /// Length normalization parameter
        #[arg(long, default_value_t = 0.75)]
        b: f32,
    },
    /// Embed and encode a corpus, then upsert it into the hosted index
    Upsert {
        /// Corpus path (JSON/JSONL file or directory); built-in demo essays when omitted
        #[arg(long)]
        input: Option<String>,
        /// Fitted state directory
        #[arg(long, default_value = "./state")]
        state: String,
        /// Hosted index name (created when missing)
        #[arg(long)]
        index: String,
        /// Vectors per upsert request
        #[arg(long, default_value_t = 5)]
        batch_size: usize,
        #[arg(long, default_value = "aws")]
        cloud: String,
        #[arg(long, default_value = "us-east-1")]
        region: String,
    },
    /// Run a single hybrid query and print ranked matches
    Query {
        /// Fitted state directory
        #[arg(long, default_value = "./state")]
        state: String,
        /// Hosted index name
        #[arg(long)]
        index: String,
        #[arg(long, default_value_t = 3)]
        top_k: u32,
        /// Query text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fit { input, state, k1, b } => fit(input.as_deref(), &state, k1, b),
        Commands::Upsert { input, state, index, batch_size, cloud, region } => {
            upsert(input.as_deref(), &state, &index, batch_size, &cloud, &region).await
        }
        Commands::Query { state, index, top_k, text } => query(&state, &index, top_k, &text).await,
    }
}

fn fit(input: Option<&str>, state: &str, k1: f32, b: f32) -> Result<()> {
    let corpus = load_corpus(input)?;
    let contents: Vec<&str> = corpus.iter().map(|d| d.content.as_str()).collect();

    let mut encoder = Bm25Encoder::new(Bm25Params { k1, b });
    encoder.fit(&contents)?;
    tracing::info!(
        num_docs = encoder.num_docs(),
        vocab_size = encoder.vocab_size(),
        "fitted sparse encoder"
    );

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_encoder(&StatePaths::new(state), &encoder, &created_at)?;
    tracing::info!(state, "fitted state saved");
    Ok(())
}

async fn upsert(
    input: Option<&str>,
    state: &str,
    index: &str,
    batch_size: usize,
    cloud: &str,
    region: &str,
) -> Result<()> {
    let corpus = load_corpus(input)?;
    let encoder = load_encoder(&StatePaths::new(state))?;

    let config = ClientConfig::from_env()?;
    let control = ControlClient::new(config.clone())?;
    let embed = EmbedClient::new(config.clone())?;

    let desc = control.ensure_index(index, EMBED_DIMENSION, "dotproduct", cloud, region).await?;
    let handle = control.index(&desc)?;
    tracing::info!(index, host = %desc.host, "index ready");

    let batch_size = batch_size.max(1);
    let mut total = 0u32;
    for batch in corpus.chunks(batch_size) {
        let texts: Vec<&str> = batch.iter().map(|d| d.content.as_str()).collect();
        let dense = embed.embed(InputType::Passage, &texts).await?;

        let mut records = Vec::with_capacity(batch.len());
        for (doc, values) in batch.iter().zip(dense) {
            let sparse = encoder.encode_document(&doc.content)?;
            records.push(VectorRecord {
                id: doc.id.clone(),
                values,
                sparse_values: (!sparse.is_empty()).then_some(sparse),
                metadata: Some(DocMetadata {
                    title: doc.title.clone(),
                    content: doc.content.clone(),
                }),
            });
        }
        let upserted = handle.upsert(&records).await?;
        total += upserted;
        tracing::info!(upserted, total, "upserted batch");
    }
    tracing::info!(total, index, "upsert complete");
    Ok(())
}

async fn query(state: &str, index: &str, top_k: u32, text: &str) -> Result<()> {
    let encoder = load_encoder(&StatePaths::new(state))?;

    let config = ClientConfig::from_env()?;
    let control = ControlClient::new(config.clone())?;
    let embed = EmbedClient::new(config.clone())?;

    let desc = control
        .describe_index(index)
        .await?
        .ok_or_else(|| anyhow!("index {index} does not exist; run upsert first"))?;
    let handle = control.index(&desc)?;

    let sparse = encoder.encode_query(text)?;
    let dense = embed
        .embed(InputType::Query, &[text])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("embed returned no vector"))?;

    let response = handle
        .query(&QueryRequest {
            top_k,
            vector: dense,
            sparse_vector: (!sparse.is_empty()).then_some(sparse),
            include_metadata: true,
        })
        .await?;

    for m in response.matches {
        let title = m.metadata.map(|md| md.title).unwrap_or_else(|| "<untitled>".into());
        println!("score: {:.4} --- Title: {}", m.score, title);
    }
    Ok(())
}

fn load_corpus(input: Option<&str>) -> Result<Vec<Document>> {
    let Some(input) = input else {
        return Ok(demo_essays());
    };
    let input_path = Path::new(input);

    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("input path {input} does not exist");
    }

    let mut corpus = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut corpus)?;
        } else {
            read_json(&file, &mut corpus)?;
        }
    }
    if corpus.is_empty() {
        bail!("no documents found under {input}");
    }
    Ok(corpus)
}

fn read_jsonl(file: &Path, corpus: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    for line in BufReader::new(f).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        corpus.push(serde_json::from_str(&line)?);
    }
    Ok(())
}

fn read_json(file: &Path, corpus: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                corpus.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => corpus.push(serde_json::from_value(json)?),
        _ => bail!("unsupported corpus format in {}", file.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_corpus_is_the_default() {
        let corpus = load_corpus(None).unwrap();
        assert_eq!(corpus.len(), 15);
    }

    #[test]
    fn missing_input_path_is_an_error() {
        assert!(load_corpus(Some("/nonexistent/corpus.json")).is_err());
    }
}
