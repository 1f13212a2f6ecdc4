use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::AppState;
use tax_core::db::{DbConfig, InMemoryRepositoryFactory, RepositoryRegistry};
use tax_data::ClientProfileLoader;
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Import client profiles from a CSV file, estimate their taxes and record
/// the calculations in the history.
///
/// The CSV file should have the following columns:
/// - name: Client or company name (at least 2 characters)
/// - company_type: INDIVIDUAL, SIMPLIFIED_CORP, PRESUMED_PROFIT_CORP or REAL_PROFIT_CORP
/// - annual_revenue: Gross annual revenue in reais
/// - state: Two-letter state code (e.g., SP)
/// - sector: TRADE, SERVICES, INDUSTRY or AGRIBUSINESS
/// - reference_month: Reference month as YYYY-MM
#[derive(Parser, Debug)]
#[command(name = "tax-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing client profiles
    #[arg(short, long)]
    file: PathBuf,

    /// Storage backend to record calculations in
    #[arg(short, long, default_value = "sqlite")]
    backend: String,

    /// Backend connection string (a database path for sqlite)
    #[arg(short, long, default_value = "taxai.db")]
    database: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(InMemoryRepositoryFactory));

    let config = DbConfig {
        backend: args.backend.clone(),
        connection_string: args.database.clone(),
    };
    let repo = registry
        .create(&config)
        .await
        .with_context(|| format!("Failed to open {} backend: {}", args.backend, args.database))?;
    let mut state = AppState::open(repo)
        .await
        .context("Failed to load calculation history")?;

    info!(file = %args.file.display(), "loading client profiles");

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = ClientProfileLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let recorded = ClientProfileLoader::load(&mut state, &records)
        .await
        .context("Failed to import client profiles")?;

    println!("Successfully recorded {} calculations.", recorded);

    Ok(())
}
