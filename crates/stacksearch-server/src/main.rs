//! StackSearch HTTP Server
//!
//! Loads every artifact once, then serves ranked question search with
//! predicted tags. Any artifact that fails to load is fatal: the process
//! logs the error and exits with status 1 before binding.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use stacksearch_core::{
    ArtifactPaths, BlendWeights, SearchConfig, SearchEngine, DEFAULT_MAX_SEQUENCE_LENGTH,
};
use stacksearch_server::config::{DEFAULT_CONCURRENCY_LIMIT, DEFAULT_HOST, DEFAULT_PORT};
use stacksearch_server::logging::{self, LogFormat};
use stacksearch_server::{serve, ServerConfig};
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(name = "stacksearch-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP API for semantic question search with tag prediction")]
struct Args {
    /// Host to bind the HTTP server to
    #[arg(long, env = "STACKSEARCH_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "STACKSEARCH_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Artifact directory (falls back to STACKSEARCH_DATA_DIR, then the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Maximum requests processed at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
    concurrency_limit: usize,

    /// Tag classifier input length
    #[arg(long, default_value_t = DEFAULT_MAX_SEQUENCE_LENGTH)]
    max_sequence_length: usize,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.log_format, Level::INFO);

    info!("StackSearch server v{} starting...", env!("CARGO_PKG_VERSION"));

    let server_config = match ServerConfig::new(args.host, args.port, args.concurrency_limit) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid server configuration: {}", e);
            std::process::exit(1);
        }
    };

    let paths = match ArtifactPaths::resolve(args.data_dir) {
        Ok(paths) => paths,
        Err(e) => {
            error!("Failed to resolve artifact directory: {}", e);
            std::process::exit(1);
        }
    };

    let search_config = match SearchConfig::new(args.max_sequence_length, BlendWeights::default()) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid search configuration: {}", e);
            std::process::exit(1);
        }
    };

    let engine = match tokio::task::spawn_blocking(move || SearchEngine::load(&paths, search_config)).await {
        Ok(Ok(engine)) => Arc::new(engine),
        Ok(Err(e)) => {
            error!("Failed to load search artifacts: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Artifact loading task failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = serve(engine, &server_config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
