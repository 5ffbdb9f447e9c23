//! CLI administration tool for linkr.
//!
//! Inspects links and access stats, and runs verification passes on demand,
//! without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Verify one link now and print the outcome
//! cargo run --bin admin -- check abc
//!
//! # Links whose last check failed
//! cargo run --bin admin -- broken
//!
//! # Ten most clicked links
//! cargo run --bin admin -- popular -n 10
//!
//! # Totals, or recent access stats for one link
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats abc --limit 50
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `linkr::config`); a database is required.

use linkr::application::services::link_service::DEFAULT_RESULT_COUNT;
use linkr::application::services::{LinkService, VerificationOutcome};
use linkr::config::{self, Config, mask_connection_string};
use linkr::domain::entities::Link;
use linkr::infrastructure::persistence::{PgLinkRepository, PgStatsRepository};
use linkr::server::{Stores, build_health_monitor};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for inspecting linkr.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Run one verification pass for a link and print the outcome
    Check {
        /// Link token
        token: String,
    },

    /// List links whose last check did not return 200
    Broken,

    /// List the most clicked links
    Popular {
        /// Number of links to show
        #[arg(short, long, default_value_t = DEFAULT_RESULT_COUNT)]
        n: i64,
    },

    /// Show totals, or recent access stats for one link
    Stats {
        /// Link token (totals if omitted)
        token: Option<String>,

        /// Number of access stats to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

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
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL (or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    let shared = Arc::new(pool.clone());
    let stores = Stores {
        links: Arc::new(PgLinkRepository::new(shared.clone())),
        stats: Arc::new(PgStatsRepository::new(shared)),
    };

    match cli.command {
        Commands::Check { token } => check_link(&config, &stores, &token).await?,
        Commands::Broken => {
            let links = LinkService::new(stores.links.clone()).broken().await?;
            print_links("Broken Links", &links);
        }
        Commands::Popular { n } => {
            let links = LinkService::new(stores.links.clone()).popular(n).await?;
            print_links("Popular Links", &links);
        }
        Commands::Stats {
            token: Some(token),
            limit,
        } => show_link_stats(&stores, &token, limit).await?,
        Commands::Stats { token: None, .. } => show_totals(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Runs a verification pass synchronously, exactly as the background worker would.
///
/// The pass is recorded like any other: an access stat is appended and the
/// cached status is updated if it changed.
async fn check_link(config: &Config, stores: &Stores, token: &str) -> Result<()> {
    let link = LinkService::new(stores.links.clone()).get_link(token).await?;

    println!("{}", "Checking destination".bright_blue().bold());
    println!("  Token: {}", link.token.cyan());
    println!("  URL:   {}", link.long_url.bright_white());
    println!();

    let monitor = build_health_monitor(config, stores)?;
    let user_agent = format!("linkr-admin/{}", env!("CARGO_PKG_VERSION"));
    let outcome = monitor.verify(&link, "", &user_agent).await;

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &VerificationOutcome) {
    let observed = outcome.observed_status.to_string();
    let observed = if outcome.observed_status == 200 {
        observed.green().bold()
    } else {
        observed.red().bold()
    };

    println!("  Previous status: {}", outcome.previous_status.to_string().bright_black());
    println!("  Observed status: {}", observed);

    if let Some(ref err) = outcome.fetch_error {
        println!("  Fetch error:     {}", err.yellow());
    }

    if outcome.status_changed() {
        let written = if outcome.status_updated {
            "updated".green()
        } else {
            "update failed".red()
        };
        println!("  Cached status:   {}", written);
    } else {
        println!("  Cached status:   {}", "unchanged".bright_black());
    }

    if !outcome.stat_recorded {
        println!("  {}", "Access stat could not be recorded".red());
    }
    println!();
}

/// Prints links as a table.
///
/// ```text
/// Popular Links
///
///   Token        Clicks   Status  Active  URL
///   ──────────────────────────────────────────────────────────────
///   abc              42      200  yes     https://example.com
/// ```
fn print_links(heading: &str, links: &[Link]) {
    println!("{}", heading.bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return;
    }

    println!(
        "  {:<12} {:>8} {:>8}  {:<6}  {}",
        "Token".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold(),
        "Active".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in links {
        let status = link.last_status_code.to_string();
        let status = if link.is_broken() {
            status.red()
        } else {
            status.green()
        };

        println!(
            "  {:<12} {:>8} {:>8}  {:<6}  {}",
            link.token.cyan(),
            link.clicks,
            status,
            if link.active { "yes" } else { "no" },
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();
}

/// Shows the newest access stats recorded for a link.
async fn show_link_stats(stores: &Stores, token: &str, limit: i64) -> Result<()> {
    let link = LinkService::new(stores.links.clone()).get_link(token).await?;
    let stats = stores.stats.list_for_link(link.id, limit.max(1)).await?;

    println!(
        "{} {}",
        "Access stats for".bright_blue().bold(),
        link.token.cyan().bold()
    );
    println!("  Clicks: {}", link.clicks.to_string().bright_green().bold());
    println!();

    if stats.is_empty() {
        println!("{}", "  No access stats recorded".yellow());
        return Ok(());
    }

    for stat in &stats {
        let status = stat.status_code.to_string();
        let status = if stat.status_code == 200 {
            status.green()
        } else {
            status.red()
        };

        println!(
            "  {}  {}  {}  {}",
            stat.created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            status,
            or_dash(&stat.referrer),
            or_dash(&stat.user_agent).bright_black()
        );
    }
    println!();

    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Displays store-wide totals.
async fn show_totals(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
        .fetch_one(pool)
        .await?;

    let broken_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE last_status_code NOT IN (0, 200)")
            .fetch_one(pool)
            .await?;

    let stats_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_stats")
        .fetch_one(pool)
        .await?;

    println!("  Links:        {}", links_count.to_string().bright_green().bold());
    println!("  Clicks:       {}", clicks_count.to_string().bright_green().bold());
    println!("  Broken:       {}", broken_count.to_string().bright_red().bold());
    println!("  Access stats: {}", stats_count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
