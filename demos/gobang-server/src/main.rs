//! Runs a Gobang server.
//!
//! ```text
//! gobang-server [config.json]
//! ```
//!
//! Without a config file the server listens on `0.0.0.0:8848`. Log
//! verbosity follows `RUST_LOG` and defaults to `info`.

use gobang::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    let server = GobangServerBuilder::new().config(config).build().await?;
    server.run().await?;
    Ok(())
}
