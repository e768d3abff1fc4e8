//! Query server binary
//!
//! Run with: cargo run --bin graph-rag-server

use graph_rag::{config::RagConfig, providers::OllamaClient, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graph_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Config file is optional; env vars override either way
    let config = match std::env::var("GRAPH_RAG_CONFIG") {
        Ok(path) => RagConfig::load(&path)?,
        Err(_) => RagConfig::from_env(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Graph store: {}", config.graph.uri);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Retrieval: top_k={}, fetch_k={}, lambda={}",
        config.retrieval.top_k,
        config.retrieval.fetch_k,
        config.retrieval.mmr_lambda
    );

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let ollama = OllamaClient::new(&config.llm)?;
    if ollama.health_check().await {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!("  2. Pull models: ollama pull nomic-embed-text && ollama pull llama3.2:3b");
    }

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/query          - Ask questions (with optional filters)");
    println!("  POST /api/search         - Direct similarity search");
    println!("  GET  /api/metadata/stats - Graph statistics");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
