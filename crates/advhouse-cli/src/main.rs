mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "advhouse")]
#[command(about = "Sync advcake advertiser orders into ClickHouse")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, enrich and load orders for the configured projects
    Run {
        /// Only sync the project with this login
        #[arg(long)]
        project: Option<String>,
        /// Fetch and transform, print the table DDL, but write nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// List the configured projects
    Projects,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = advhouse_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run { project, dry_run } => {
            run::run_sync(&config, project.as_deref(), dry_run).await
        }
        Commands::Projects => run::list_projects(&config),
    }
}

#[cfg(test)]
mod tests;
