use clap::Parser;
use gitlabform_cli::cli::{Cli, LOG_FILTER_ENV};
use gitlabform_cli::run::execute;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match execute(&cli).await {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
