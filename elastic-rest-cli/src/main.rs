use std::error::Error;
use std::io;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use elastic_rest_cli::{commands, Cli, CliError, Dependencies, LogFormat};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {}", err);
            source = err.source();
        }

        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let dependencies = Dependencies::new(&cli.connection).await?;

    info!(command = ?cli.command, "Running command");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli.command, &dependencies.client, &dependencies.cluster, &mut out).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
