//! CLI administration tool for shortcode.
//!
//! Checks URLs and codes against the service rules, previews generated codes
//! and prints statistics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Validate and normalize a URL
//! cargo run --bin admin -- check-url "https://Example.com:443/page"
//!
//! # Validate a custom code (and check availability when a database is set)
//! cargo run --bin admin -- check-code my-link
//!
//! # Preview the hash-based code and a few random alternatives
//! cargo run --bin admin -- generate "https://example.com/page" --random 3
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required for `stats`)
//! - `SHORT_CODE_LENGTH`, `SHORT_CODE_ALPHABET`, `CODE_MAX_ATTEMPTS`: generator settings

use shortcode::application::services::StatsService;
use shortcode::application::services::stats_service::DEFAULT_STATS_DAYS;
use shortcode::config::Config;
use shortcode::domain::repositories::LinkRepository;
use shortcode::infrastructure::persistence::PgLinkRepository;
use shortcode::utils::code_validator::validate_custom_code;
use shortcode::utils::format::format_click_count;
use shortcode::utils::url_normalizer::normalize_url;
use shortcode::utils::url_validator::validate_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortcode.
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
    /// Validate and normalize a URL
    CheckUrl {
        url: String,

        /// Skip the suspicious TLD and private address checks
        #[arg(long)]
        lenient: bool,
    },

    /// Validate a custom short code
    CheckCode { code: String },

    /// Show the codes the generator would produce for a URL
    Generate {
        url: String,

        /// Number of random alternatives to print
        #[arg(short, long, default_value_t = 0)]
        random: usize,
    },

    /// Show statistics
    Stats {
        /// Window of the daily histogram
        #[arg(short, long, default_value_t = DEFAULT_STATS_DAYS)]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::CheckUrl { url, lenient } => check_url(&url, !lenient),
        Commands::CheckCode { code } => check_code(&config, &code).await?,
        Commands::Generate { url, random } => generate(&config, &url, random)?,
        Commands::Stats { days } => handle_stats(&config, days).await?,
    }

    Ok(())
}

/// Prints the verdict for a URL and its normalized form.
fn check_url(url: &str, strict: bool) {
    println!("{}", "🔗 URL check".bright_blue().bold());
    println!();
    println!("  Input:  {}", url.cyan());

    match validate_url(url, strict) {
        Ok(()) => {
            let normalized = normalize_url(url);
            println!("  Status: {}", "VALID".green().bold());
            println!("  Normal: {}", normalized.as_str().bright_white());
        }
        Err(e) => {
            println!("  Status: {}", "INVALID".red().bold());
            println!("  Reason: {}", e.to_string().yellow());
        }
    }
    println!();
}

/// Prints the verdict for a custom code.
///
/// When `DATABASE_URL` is set, also reports whether the code is taken.
async fn check_code(config: &Config, code: &str) -> Result<()> {
    println!("{}", "🏷️  Code check".bright_blue().bold());
    println!();
    println!("  Code:   {}", code.cyan());

    if let Err(e) = validate_custom_code(code) {
        println!("  Status: {}", "INVALID".red().bold());
        println!("  Reason: {}", e.to_string().yellow());
        println!();
        return Ok(());
    }

    match &config.database_url {
        Some(_) => {
            let repo = connect(config).await?;
            let taken = repo
                .code_exists(code)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to look up code: {}", e))?;

            if taken {
                println!("  Status: {}", "TAKEN".yellow().bold());
            } else {
                println!("  Status: {}", "AVAILABLE".green().bold());
            }
        }
        None => {
            println!("  Status: {}", "VALID".green().bold());
            println!(
                "  {}",
                "Set DATABASE_URL to check availability".bright_black()
            );
        }
    }
    println!();

    Ok(())
}

/// Prints the hash-based code for a URL and optional random alternatives.
fn generate(config: &Config, url: &str, random: usize) -> Result<()> {
    let generator = config.code_generator()?;

    println!("{}", "✨ Code generation".bright_blue().bold());
    println!();

    let normalized = normalize_url(url);
    if !normalized.is_canonical() {
        println!(
            "  {}",
            "⚠️  URL could not be normalized, hashing it as given".yellow()
        );
    }

    println!("  URL:    {}", normalized.as_str().cyan());
    println!(
        "  Hash:   {}",
        generator
            .hash_code(normalized.as_str(), None)
            .bright_yellow()
            .bold()
    );

    for i in 0..random {
        println!(
            "  Random: {}  {}",
            generator.random_code(None).bright_white(),
            format!("#{}", i + 1).bright_black()
        );
    }

    println!();
    println!(
        "  Alphabet: {} chars, length {}",
        generator.alphabet().len().to_string().bright_white(),
        generator.length().to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Displays link statistics.
///
/// Shows:
/// - Total number of links and clicks
/// - Average clicks per link
/// - Most common domains
/// - Most clicked links
async fn handle_stats(config: &Config, days: i64) -> Result<()> {
    let repo = connect(config).await?;
    let service = StatsService::new(repo);

    let summary = service
        .summary(days)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!(
        "  Links:          {}",
        summary.total_links.to_string().bright_white().bold()
    );
    println!(
        "  Clicks:         {}",
        format_click_count(summary.total_clicks).bright_white().bold()
    );
    println!(
        "  Avg per link:   {}",
        format!("{:.2}", summary.average_clicks).bright_white()
    );
    println!(
        "  Created ({days}d):  {}",
        summary
            .daily_links
            .iter()
            .map(|d| d.links)
            .sum::<i64>()
            .to_string()
            .bright_white()
    );
    println!();

    if !summary.popular_domains.is_empty() {
        println!("{}", "  Top domains".bright_white().bold());
        println!("  {}", "─".repeat(50).bright_black());
        for domain in summary.popular_domains.iter().take(5) {
            println!(
                "  {:<40} {}",
                domain.domain.cyan(),
                domain.links.to_string().bright_black()
            );
        }
        println!();
    }

    if !summary.top_links.is_empty() {
        println!("{}", "  Most clicked".bright_white().bold());
        println!("  {}", "─".repeat(75).bright_black());
        for link in &summary.top_links {
            println!(
                "  {:<12} {:>8}  {}",
                link.code.cyan(),
                format_click_count(link.click_count).bright_white(),
                link.long_url.bright_black()
            );
        }
        println!();
    }

    Ok(())
}

/// Connects to the configured database.
async fn connect(config: &Config) -> Result<Arc<PgLinkRepository>> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}
