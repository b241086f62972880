//! GraphQL server for the in-memory library.
//!
//! Seeds the author and book tables, mounts the GraphQL endpoint with
//! its GraphiQL explorer, and serves until Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use library_api::{router::Router, schema::build_schema, server::Server};
use library_core::{config::ServerConfig, Library};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the library server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Disable the GraphiQL explorer on GET /graphql
    #[arg(long)]
    no_graphiql: bool,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_body_bytes: usize,

    /// Print the schema in SDL form and exit
    #[arg(long)]
    print_schema: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            graphiql: !args.no_graphiql,
            request_timeout_ms: args.request_timeout_ms,
            max_body_bytes: args.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let library = Arc::new(Library::seeded());
    let schema = build_schema(Arc::clone(&library));

    if args.print_schema {
        println!("{}", schema.sdl());
        return Ok(());
    }

    let config = Arc::new(ServerConfig::from(args));
    let addr: SocketAddr = tokio::net::lookup_host(config.bind_address())
        .await
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?
        .next()
        .with_context(|| format!("No address found for {}", config.bind_address()))?;

    tracing::info!(
        authors = library.author_count(),
        books = library.book_count(),
        graphiql = config.graphiql,
        "Starting library server"
    );

    let router = Router::new(schema, Arc::clone(&config));
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server");
    server_handle.abort();

    Ok(())
}
