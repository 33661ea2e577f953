//! Command-line entry point for the reference-data migration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docstore::DumpStore;
use refdata_sync::db::{connection, migrate};
use refdata_sync::orchestrate::{self, SyncOptions};

#[derive(Parser)]
#[command(name = "refdata-sync", about = "Bond reference-data migration engine")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Migrate a document dump into the relational schema.
    Migrate {
        /// Directory holding one <collection>.jsonl file per collection.
        #[arg(long)]
        source_dir: std::path::PathBuf,
        /// Stop after this many securities (bounded test mode).
        #[arg(long)]
        limit: Option<usize>,
        /// Attach document snapshots to failure rows.
        #[arg(long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Migrate {
            source_dir,
            limit,
            verbose,
        } => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            migrate::run_all(&database_url).context("apply schema migrations")?;
            let mut conn = connection::connect_sqlite(&database_url)
                .context("open destination database")?;

            let store = DumpStore::load(&source_dir)
                .with_context(|| format!("load dump from {}", source_dir.display()))?;

            let summary =
                orchestrate::run_migration(&mut conn, &store, &SyncOptions { limit, verbose })?;
            println!("{summary}");
        }
    }
    Ok(())
}
