// repofetch command line entry point.
// Loads config, fetches (or reads cached) repository data, prints JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use repofetch::{Config, RepoDataFetcher, logging};

#[derive(Parser)]
#[command(name = "repofetch")]
#[command(version, about = "Fetch GitHub repository metadata with a local cache", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.logging);

    let fetcher = RepoDataFetcher::from_config(&config)?;
    let data = fetcher.get_data().await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&data)?
    } else {
        serde_json::to_string(&data)?
    };
    println!("{}", output);

    Ok(if data.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
