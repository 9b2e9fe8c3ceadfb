//! Vigil CLI — file integrity monitoring.

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    version,
    about = "File integrity monitoring — SQLite-backed baselines, streaming digests, drift detection"
)]
struct Cli {
    #[command(subcommand)]
    command: vigil::cli::Commands,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = vigil::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
