//! CLI administration tool for country-listing.
//!
//! Runs the dataset update, prints the regional report, and performs
//! database checks without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the published dataset and reconcile it
//! cargo run --bin admin -- update
//!
//! # Reconcile from another URL or a local file
//! cargo run --bin admin -- update --url https://example.com/countries.json
//! cargo run --bin admin -- update --file ./countries.json
//!
//! # Show what would change without persisting anything
//! cargo run --bin admin -- update --dry-run
//!
//! # View the regional report
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`country_listing::config`].

use country_listing::application::services::{
    ReconcileOptions, ReconcileReport, ReconcileService, ReportService,
};
use country_listing::config::{self, Config};
use country_listing::domain::effect::{EffectAction, EntityKind};
use country_listing::domain::source::CountrySource;
use country_listing::infrastructure::persistence::{PgListingStore, PgReportRepository};
use country_listing::infrastructure::sources::{FileCountrySource, HttpCountrySource};
use country_listing::{logging, server};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing country-listing.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Fetch the country dataset and reconcile the database with it
    Update {
        /// Dataset URL (defaults to SOURCE_URL)
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Read the dataset from a local JSON file instead
        #[arg(long)]
        file: Option<PathBuf>,

        /// Run every phase, then roll back
        #[arg(long)]
        dry_run: bool,
    },

    /// Show countries and population per region
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    // Effect lines are logged as they are applied, so they show even when a run fails.
    logging::init(&config.log_level, &config.log_format)?;

    let pool = server::connect_pool(&config).await?;

    match cli.command {
        Commands::Update { url, file, dry_run } => {
            handle_update(&config, &pool, url, file, dry_run).await?
        }
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Fetches the dataset and runs one reconciliation.
async fn handle_update(
    config: &Config,
    pool: &PgPool,
    url: Option<String>,
    file: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    println!("{}", "🌍 Update Country Listing".bright_blue().bold());
    println!();

    server::migrate(pool).await?;

    let source: Box<dyn CountrySource> = match file {
        Some(path) => Box::new(FileCountrySource::new(path)),
        None => {
            let url = url.unwrap_or_else(|| config.source_url.clone());
            Box::new(HttpCountrySource::new(&url, config.fetch_timeout())?)
        }
    };

    println!("  Source: {}", source.describe().cyan());
    if dry_run {
        println!("  Mode:   {}", "dry run".yellow());
    }
    println!();

    let store = Arc::new(PgListingStore::new(Arc::new(pool.clone())));
    let service = ReconcileService::new(store);

    let report = match service
        .update_from_source(source.as_ref(), ReconcileOptions { dry_run })
        .await
    {
        Ok(report) => report,
        Err(e) => {
            println!("{}", "❌ Update failed, no changes were saved".red().bold());
            println!("  {}", e.to_string().red());
            let details = e.to_error_info().details;
            if !details.is_null() && details != serde_json::json!({}) {
                println!("  {}", details.to_string().bright_black());
            }
            println!();
            return Err(e.into());
        }
    };

    print_effects(&report);

    if report.dry_run {
        println!("{}", "🧪 Dry run finished, changes rolled back".yellow().bold());
    } else {
        println!("{}", "✅ Update committed".green().bold());
    }
    println!();

    Ok(())
}

fn print_effects(report: &ReconcileReport) {
    if report.effects.is_empty() {
        println!("{}", "  Nothing to do".yellow());
        println!();
        return;
    }

    println!(
        "  {:<16} {:>8} {:>8} {:>8}",
        "".bright_white().bold(),
        "Created".bright_white().bold(),
        "Updated".bright_white().bold(),
        "Deleted".bright_white().bold()
    );
    println!("  {}", "─".repeat(43).bright_black());

    for entity in [
        EntityKind::Region,
        EntityKind::TopLevelDomain,
        EntityKind::Country,
    ] {
        println!(
            "  {:<16} {:>8} {:>8} {:>8}",
            entity.as_str().cyan(),
            report.count(entity, EffectAction::Created),
            report.count(entity, EffectAction::Updated),
            report.count(entity, EffectAction::Deleted)
        );
    }

    let elapsed = report.finished_at - report.started_at;
    println!();
    println!(
        "  Records: {}  Time: {} ms",
        report.records.to_string().bright_white().bold(),
        elapsed.num_milliseconds().to_string().bright_black()
    );
    println!();
}

/// Displays the regional report.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Regions".bright_blue().bold());
    println!();

    let repository = Arc::new(PgReportRepository::new(Arc::new(pool.clone())));
    let regions = ReportService::new(repository).region_report().await?;

    if regions.is_empty() {
        println!("{}", "  No regions found".yellow());
        println!();
        println!(
            "  Load the dataset with: {} admin update",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<30} {:>10} {:>16}",
        "Region".bright_white().bold(),
        "Countries".bright_white().bold(),
        "Population".bright_white().bold()
    );
    println!("  {}", "─".repeat(58).bright_black());

    for region in &regions {
        let population = match region.total_population {
            Some(total) => total.to_string().normal(),
            None => "-".bright_black(),
        };

        println!(
            "  {:<30} {:>10} {:>16}",
            region.name.cyan(),
            region.number_countries,
            population
        );
    }

    println!();
    println!(
        "  Total: {}",
        regions.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let regions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions")
                .fetch_one(pool)
                .await?;
            let countries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
                .fetch_one(pool)
                .await?;
            let domains: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM top_level_domains")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL:        {}", version.bright_white());
            println!(
                "  Regions:           {}",
                regions.to_string().bright_green().bold()
            );
            println!(
                "  Countries:         {}",
                countries.to_string().bright_green().bold()
            );
            println!(
                "  Top-level domains: {}",
                domains.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
