//! marquee server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use marquee_client::{OmdbClient, OmdbConfig, TmdbClient, TmdbConfig};
use marquee_core::{AggregationService, AppConfig, DetailCache, SearchCache, ServiceOptions};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    if let Err(e) = config.require_omdb_api_key() {
        tracing::warn!(error = %e, "OMDb calls will fail until a key is configured");
    }
    if let Err(e) = config.require_tmdb_api_key() {
        tracing::warn!(error = %e, "TMDB calls will fail until a key is configured");
    }

    let omdb = OmdbClient::new(OmdbConfig::from(&config)).context("failed to build OMDb client")?;
    let tmdb = TmdbClient::new(TmdbConfig::from(&config)).context("failed to build TMDB client")?;

    let search_cache = Arc::new(SearchCache::new(config.cache_max_entries, config.cache_ttl()));
    let detail_cache = Arc::new(DetailCache::new(config.cache_max_entries, config.cache_ttl()));
    let service = AggregationService::new(omdb, tmdb, search_cache, detail_cache, ServiceOptions::from(&config));

    tracing::info!(
        cache_ttl_secs = config.cache_ttl_secs,
        cache_max_entries = config.cache_max_entries,
        "Starting marquee server on stdio transport"
    );

    let handler = handler::MovieServer::new(Arc::new(service));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
