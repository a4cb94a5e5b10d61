// ==========================================
// Humidor Hub - CLI entry point
// ==========================================

use clap::Parser;
use humidor_hub::app::{get_default_db_path, AppState};
use humidor_hub::cli::{commands, Cli, Commands};
use humidor_hub::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let global = cli.global;

    logging::init_with_default(if global.verbose { "debug" } else { "warn" });

    let db_path = global.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!(version = humidor_hub::VERSION, db_path = %db_path, "humidor-hub starting");

    let state = AppState::new(db_path);

    match cli.command {
        Commands::Import(args) => commands::run_import(args, &state, &global).await,
        Commands::Export(args) => commands::run_export(args, &state).await,
        Commands::Mapping(args) => commands::run_mapping(args, &state, &global).await,
        Commands::Fields(args) => commands::run_fields(args, &global),
        Commands::Config(cmd) => commands::run_config(cmd, &state, &global),
    }
}
