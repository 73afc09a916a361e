//! This is the main entry point for promptstore.

use colored::Colorize;
use promptstore::{cli, config, error::CommandError};
use tracing_subscriber::EnvFilter;

fn main() {
    // loaded before the subscriber so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    // stderr only: stdout is the MCP transport when serving
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,promptstore=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config::dotenv_failure(dotenv) {
        tracing::warn!("ignoring .env: {e}");
    }

    if let Err(e) = cli::parse(None) {
        match &e {
            CommandError::Usage(usage) => {
                let _ = usage.print();
            }
            CommandError::Partial { .. } => {}
            _ => eprintln!("{}", format!("Error: {e}").red()),
        }
        std::process::exit(e.exit_code());
    }
}
