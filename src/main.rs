mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "symbol_writer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => cli::serve()?,
        Commands::Info { db } => cli::info(&db)?,
        Commands::Clear { db } => cli::clear(&db)?,
        Commands::Version => cli::version(),
    }

    Ok(())
}
