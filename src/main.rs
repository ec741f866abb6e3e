//! cluster-complete
//!
//! Resolves shell completions for a cluster-facing developer CLI.
//!
//! # Usage
//!
//! ```bash
//! # Install the dynamic hook for `odo`
//! source <(cluster-complete completion bash --program odo)
//!
//! # What the hook runs on `odo link <TAB>`
//! cluster-complete --component frontend complete -- link ""
//! ```

use cluster_complete::cli::CliInterface;
use cluster_complete::error::Result;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Parse arguments, load configuration, initialize logging and run the
/// selected command.
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.handle_command().await
}

/// Initialize logging to stderr; stdout carries only command output
///
/// # Arguments
/// * `cli` - CLI interface with the effective logging settings
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(logging.level.to_tracing_level())
        .with_writer(std::io::stderr)
        .with_target(false);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
