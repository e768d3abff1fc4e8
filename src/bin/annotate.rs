//! Metadata graph setup: annotate documents from a TOML catalog
//!
//! Run with: cargo run --bin graph-rag-annotate -- documents.toml [--clear]

use graph_rag::config::{AnnotationCatalog, RagConfig};
use graph_rag::providers::Neo4jMetadataIndex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graph_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let catalog_path = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: graph-rag-annotate <catalog.toml> [--clear]"))?;
    let clear = args.any(|a| a == "--clear");

    let config = match std::env::var("GRAPH_RAG_CONFIG") {
        Ok(path) => RagConfig::load(&path)?,
        Err(_) => RagConfig::from_env(),
    };

    let catalog = AnnotationCatalog::load(&catalog_path)?;
    tracing::info!(
        "Loaded catalog with {} document entries",
        catalog.documents.len()
    );

    let graph = Neo4jMetadataIndex::new(&config.graph)?;

    if clear {
        graph.clear_graph().await?;
        tracing::info!("Cleared existing graph");
    }

    graph.create_indexes().await?;

    for filename in catalog.documents.keys() {
        let annotation = catalog.annotation_for(filename);
        graph.annotate_document(filename, filename, &annotation).await?;
        tracing::info!("Annotated {}", filename);
    }

    tracing::info!("Done: {} documents annotated", catalog.documents.len());
    Ok(())
}
