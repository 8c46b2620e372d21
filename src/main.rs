use clap::Parser;
use gengo::cli::{
    self,
    Cli,
};
use tracing_subscriber::EnvFilter;

fn log_filter(verbose: u8) -> EnvFilter {
    let default = match verbose {
        0 => "gengo=warn",
        1 => "gengo=info",
        _ => "gengo=debug",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli)
        .await
        .map_err(|e| anyhow::anyhow!(cli::failure_message(&e)))
}
