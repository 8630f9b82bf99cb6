use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tweetstats::cli::{commands, report_views, Cli, Commands};
use tweetstats::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind, open } => {
            commands::serve(config, bind, open).await?;
        }
        Commands::Report { path, view } => {
            commands::report(&path, &report_views(view), &mut io::stdout().lock())?;
        }
        Commands::Db => {
            commands::db(&config, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
