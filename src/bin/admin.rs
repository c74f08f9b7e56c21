//! CLI administration tool for clicktrail.
//!
//! Creates aliases and prints windowed analytics straight from the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an alias (prompts for anything not given)
//! cargo run --bin clicktrail-admin -- alias create --url https://example.com/spring --alias promo
//!
//! # Analytics
//! cargo run --bin clicktrail-admin -- stats overall --window 30d
//! cargo run --bin clicktrail-admin -- stats topic spring
//! cargo run --bin clicktrail-admin -- stats alias promo --window 24h
//!
//! # Check database connection
//! cargo run --bin clicktrail-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `DATABASE_URL` (or `DB_*`) is required.

use clicktrail::application::services::{
    Aggregator, AliasCreation, ClickRecorder, CreateAlias, LinkResolver,
};
use clicktrail::config::{self, Config, StorageBackend};
use clicktrail::domain::aggregate::AggregateResult;
use clicktrail::domain::window::{TimeWindow, WindowSpec};
use clicktrail::infrastructure::cache::NullCache;
use clicktrail::infrastructure::geo::NullGeoEnricher;
use clicktrail::server;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use std::collections::BTreeMap;
use std::sync::Arc;

/// CLI tool for managing clicktrail.
#[derive(Parser)]
#[command(name = "clicktrail-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage aliases
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Show click analytics
    Stats {
        #[command(subcommand)]
        scope: StatsScope,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum AliasAction {
    /// Create an alias
    Create {
        /// Destination URL
        #[arg(short, long)]
        url: Option<String>,

        /// Custom alias code (generated if omitted)
        #[arg(short, long)]
        alias: Option<String>,

        /// Topic the alias belongs to
        #[arg(short, long)]
        group: Option<String>,

        /// Owner recorded on the alias
        #[arg(long, default_value = "admin")]
        owner: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StatsScope {
    /// All clicks
    Overall {
        /// Trailing window, e.g. 24h, 7d, 90m
        #[arg(short, long, default_value_t = WindowSpec::default())]
        window: WindowSpec,
    },

    /// Clicks on every alias in a topic
    Topic {
        group: String,

        #[arg(short, long, default_value_t = WindowSpec::default())]
        window: WindowSpec,
    },

    /// Clicks on one alias
    Alias {
        code: String,

        #[arg(short, long, default_value_t = WindowSpec::default())]
        window: WindowSpec,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("clicktrail-admin requires STORAGE_BACKEND=postgres");
    }

    match cli.command {
        Commands::Alias { action } => handle_alias_action(action, &config).await?,
        Commands::Stats { scope } => handle_stats(scope, &config).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

async fn handle_alias_action(action: AliasAction, config: &Config) -> Result<()> {
    match action {
        AliasAction::Create {
            url,
            alias,
            group,
            owner,
            yes,
        } => create_alias(config, url, alias, group, owner, yes).await,
    }
}

/// Creates an alias with interactive prompts.
///
/// Repeating a create with the same code and destination reports the
/// existing alias instead of failing.
async fn create_alias(
    config: &Config,
    url: Option<String>,
    alias: Option<String>,
    group: Option<String>,
    owner: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Alias".bright_blue().bold());
    println!();

    let destination_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Destination URL")
            .interact_text()?,
    };

    println!("{}", "Alias details:".bright_white().bold());
    println!("  Destination: {}", destination_url.cyan());
    println!(
        "  Alias:       {}",
        alias.as_deref().unwrap_or("(generated)").cyan()
    );
    println!("  Group:       {}", group.as_deref().unwrap_or("-").cyan());
    println!("  Owner:       {}", owner.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this alias?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let (destinations, events) = server::build_stores(config).await?;
    let cache = Arc::new(NullCache::new());
    let recorder = Arc::new(ClickRecorder::new(
        Arc::new(NullGeoEnricher::new()),
        events,
        cache.clone(),
    ));
    let resolver = LinkResolver::new(destinations, cache, recorder);

    let creation = resolver
        .create_alias(CreateAlias {
            destination_url,
            requested_code: alias,
            group,
            owner_id: owner,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create alias: {}", e))?;

    println!();
    match creation {
        AliasCreation::Created(ref a) => {
            println!("{}", "✅ Alias created".green().bold());
            println!("  /r/{} → {}", a.code.bright_yellow(), a.destination_url);
        }
        AliasCreation::Existing(ref a) => {
            println!("{}", "⚠️  Alias already exists with this destination".yellow());
            println!("  /r/{} → {}", a.code.bright_yellow(), a.destination_url);
        }
    }
    println!();

    Ok(())
}

/// Prints an aggregate for the requested scope.
async fn handle_stats(scope: StatsScope, config: &Config) -> Result<()> {
    let (destinations, events) = server::build_stores(config).await?;
    let aggregator = Aggregator::new(destinations, events);
    let now = Utc::now();

    let (title, window, result) = match scope {
        StatsScope::Overall { window } => {
            let window = window.ending_at(now);
            let result = aggregator.aggregate_overall(window).await;
            ("Overall".to_string(), window, result)
        }
        StatsScope::Topic { group, window } => {
            let window = window.ending_at(now);
            let result = aggregator.aggregate_by_topic(&group, window).await;
            (format!("Topic {group}"), window, result)
        }
        StatsScope::Alias { code, window } => {
            let window = window.ending_at(now);
            let result = aggregator.aggregate_by_alias(&code, window).await;
            (format!("Alias {code}"), window, result)
        }
    };

    let result = result.map_err(|e| anyhow::anyhow!("Failed to aggregate: {}", e))?;
    print_aggregate(&title, window, &result);

    Ok(())
}

/// Renders an aggregate as an indented report.
///
/// # Output Format
///
/// ```text
/// 📊 Alias promo
///   2024-03-03 12:00 → 2024-03-10 12:00
///
///   Clicks:        3
///   Unique users:  2
///
///   By day
///     2024-03-08   2
///     2024-03-10   1
/// ```
fn print_aggregate(title: &str, window: TimeWindow, result: &AggregateResult) {
    println!("{}", format!("📊 {title}").bright_blue().bold());
    println!(
        "  {} → {}",
        window.start.format("%Y-%m-%d %H:%M").to_string().bright_black(),
        window.end.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();
    println!(
        "  Clicks:        {}",
        result.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Unique users:  {}",
        result.unique_users.to_string().bright_green().bold()
    );

    let by_day: BTreeMap<String, u64> = result
        .clicks_by_day
        .iter()
        .map(|(day, n)| (day.to_string(), *n))
        .collect();
    print_breakdown("By day", &by_day);
    print_breakdown("By OS", &result.breakdown_by_os);
    print_breakdown("By device", &result.breakdown_by_device);
    print_breakdown("By country", &result.breakdown_by_country);

    if let Some(ref per_alias) = result.per_alias_breakdown {
        println!();
        println!("  {}", "By alias".bright_white().bold());
        if per_alias.is_empty() {
            println!("    {}", "no aliases in this topic".yellow());
        }
        for (code, breakdown) in per_alias {
            println!(
                "    {:<20} {:>8} clicks {:>8} users",
                code.cyan(),
                breakdown.total_clicks,
                breakdown.unique_users
            );
        }
    }
    println!();
}

fn print_breakdown(label: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("  {}", label.bright_white().bold());
    for (key, n) in counts {
        println!("    {:<20} {:>8}", key.cyan(), n);
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = server::connect_database(config)
                .await
                .context("Database check failed")?;
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
