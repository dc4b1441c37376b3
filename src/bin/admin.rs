//! CLI administration tool for url-redirector.
//!
//! Provides maintenance commands that operate directly on the database
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete every expired link and drop its cache entry
//! cargo run --bin admin -- purge
//!
//! # Inspect a single short code
//! cargo run --bin admin -- show ab1cd
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (see `url_redirector::config`).
//! `DATABASE_URL` is required; `REDIS_URL` is used by `purge` to invalidate
//! cached destinations.

use url_redirector::config::{self, Config};
use url_redirector::domain::repositories::UrlRepository;
use url_redirector::infrastructure::cache::{CacheService, RedisCache};
use url_redirector::infrastructure::persistence::PgUrlRepository;
use url_redirector::server::connect_pool;
use url_redirector::utils::display_time::{format_display, offset_from_minutes};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-redirector.
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
    /// Delete expired links and invalidate their cache entries
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show every record stored under a short code
    Show {
        /// Short code to look up
        code: String,
    },

    /// Show statistics
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

#[derive(sqlx::FromRow)]
struct RecordRow {
    custom_domain: String,
    main_url: String,
    click_count: i64,
    max_clicks: Option<i64>,
    created_at: chrono::DateTime<Utc>,
    expires_at: Option<chrono::DateTime<Utc>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Purge { yes } => handle_purge(&config, pool, yes).await?,
        Commands::Show { code } => handle_show(&config, &pool, &code).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Deletes expired links, then drops their Redis entries.
///
/// The in-process cache lives inside the server, so without Redis the
/// stale entries simply age out or are rejected by the liveness check on
/// the next redirect.
async fn handle_purge(config: &Config, pool: PgPool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge expired links".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete every expired link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let repo = PgUrlRepository::new(Arc::new(pool));
    let purged = repo
        .purge_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge links: {}", e))?;

    println!(
        "  Deleted: {}",
        purged.len().to_string().bright_green().bold()
    );

    let redis_url = config.redis_url.as_deref().filter(|_| config.cache_enabled);
    if let Some(redis_url) = redis_url
        && !purged.is_empty()
    {
        let cache = RedisCache::connect(redis_url)
            .await
            .context("Failed to connect to Redis")?;

        let mut failed = 0usize;
        for code in &purged {
            if cache.delete(code).await.is_err() {
                failed += 1;
            }
        }

        println!(
            "  Cache entries removed: {}",
            (purged.len() - failed).to_string().bright_green().bold()
        );
        if failed > 0 {
            println!(
                "{}",
                format!("⚠️  {failed} cache entries could not be removed").yellow()
            );
        }
    }

    println!();
    println!("{}", "✅ Purge complete".green().bold());
    println!();

    Ok(())
}

/// Prints every record stored under `code`, one per domain.
async fn handle_show(config: &Config, pool: &PgPool, code: &str) -> Result<()> {
    println!("{} {}", "🔎 Short code".bright_blue().bold(), code.cyan());
    println!();

    let rows: Vec<RecordRow> = sqlx::query_as(
        r#"
        SELECT custom_domain, main_url, click_count, max_clicks, created_at, expires_at
        FROM shortened_urls
        WHERE short_url = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(code)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        println!("{}", "  No records found".yellow());
        return Ok(());
    }

    let offset = offset_from_minutes(config.display_utc_offset_minutes);
    let now = Utc::now();

    for row in &rows {
        let clicks_left = row.max_clicks.is_none_or(|max| row.click_count < max);
        let time_left = row.expires_at.is_none_or(|expires| expires > now);
        let status = if clicks_left && time_left {
            "LIVE".green()
        } else {
            "EXPIRED".red()
        };

        let max_clicks = row
            .max_clicks
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let expires = row
            .expires_at
            .map(|ts| format_display(ts, offset))
            .unwrap_or_else(|| "never".to_string());

        println!("  Domain:   {}", row.custom_domain.cyan());
        println!("  Target:   {}", row.main_url.bright_white());
        println!("  Clicks:   {} / {}", row.click_count, max_clicks);
        println!(
            "  Created:  {}",
            format_display(row.created_at, offset).bright_black()
        );
        println!("  Expires:  {}", expires.bright_black());
        println!("  Status:   {}", status);
        println!("  {}", "─".repeat(60).bright_black());
    }

    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Number of links that are no longer live
/// - Total number of recorded visits
/// - Number of campaign tags
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortened_urls")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM shortened_urls
        WHERE (max_clicks IS NOT NULL AND click_count >= max_clicks)
           OR (expires_at IS NOT NULL AND expires_at <= NOW())
        "#,
    )
    .fetch_one(pool)
    .await?;

    let visits_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visit_logs")
        .fetch_one(pool)
        .await?;

    let campaigns_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaign_tags")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired:       {}",
        expired_count.to_string().bright_yellow().bold()
    );
    println!(
        "  Visits:        {}",
        visits_count.to_string().bright_green().bold()
    );
    println!(
        "  Campaign tags: {}",
        campaigns_count.to_string().bright_green().bold()
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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
