//! # cedex - Legacy Cadastral Edit History Exporter
//!
//! The main binary for the cedex export engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              apps/cedex (THE BINARY)           │
//! │                                               │
//! │  ┌─────────────┐         ┌────────────────┐   │
//! │  │    CLI      │         │  cedex.toml    │   │
//! │  │   (clap)    │         │  (toml/serde)  │   │
//! │  └──────┬──────┘         └───────┬────────┘   │
//! │         └────────────┬───────────┘            │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │  cedex-core   │                │
//! │              │  (THE LOGIC)  │                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! cedex snapshot -i riverside.json -o riverside.cedx.bin
//! cedex check -i riverside.cedx.bin -t binary
//! cedex export -i riverside.cedx.bin -t binary --root /srv/exports
//! cedex status -m riverside.cedx --root /srv/exports
//! ```

use cedex::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // CEDEX_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("CEDEX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cedex=info,cedex_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    match cli::execute(cli) {
        Ok(()) => {}
        Err(e) if e.is_refusal() => {
            tracing::warn!("{}", e);
        }
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
