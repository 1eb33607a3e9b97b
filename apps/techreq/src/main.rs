//! techreq command-line entry point.

use clap::Parser;

use techreq::cli::{Cli, run};
use techreq::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }

    let config = cli.config();
    if let Err(error) = run(cli.command, &config).await {
        tracing::error!(%error, "command failed");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
