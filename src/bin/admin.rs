//! CLI administration tool for shop-for-good.
//!
//! Works directly on the configured settings and statistics stores, the same
//! ones the engine uses, so changes are picked up on the next navigation.
//!
//! # Usage
//!
//! ```bash
//! # Show or toggle rewriting
//! cargo run --bin admin -- settings show
//! cargo run --bin admin -- settings disable
//!
//! # Pick the charity receiving affiliate revenue
//! cargo run --bin admin -- charity list
//! cargo run --bin admin -- charity select charity2
//!
//! # Conversion statistics
//! cargo run --bin admin -- stats show
//! cargo run --bin admin -- stats export -o conversions.json
//! cargo run --bin admin -- stats clear
//!
//! # Preview a rewrite
//! cargo run --bin admin -- rewrite "https://amazon.com/gp/product/B07XYZ1234?ref=abc"
//! ```
//!
//! # Environment Variables
//!
//! Same as the engine: `STORAGE_BACKEND`, `DATA_DIR`, `REDIS_URL`,
//! `DEFAULT_AFFILIATE_ID` and `ANCHOR_REWRITE_MODE` (used by `rewrite`).

use shop_for_good::application::services::{
    AnchorRewriteMode, LinkScanner, SettingsService, StatsService,
};
use shop_for_good::config;
use shop_for_good::domain::entities::AffiliateTag;
use shop_for_good::infrastructure::persistence::{KvSettingsRepository, KvStatsRepository};
use shop_for_good::infrastructure::storage::open_stores;
use shop_for_good::utils::url_rewriter::{RewriteResult, rewrite_url};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Select};
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing shop-for-good.
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
    /// Show or toggle rewriting
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Browse and select charities
    Charity {
        #[command(subcommand)]
        action: CharityAction,
    },

    /// Conversion statistics
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },

    /// Preview how a URL would be rewritten
    Rewrite {
        /// URL to rewrite
        url: String,

        /// Affiliate tag to use (defaults to the stored one)
        #[arg(short, long)]
        tag: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,
    /// Turn rewriting on
    Enable,
    /// Turn rewriting off
    Disable,
}

#[derive(Subcommand)]
enum CharityAction {
    /// List available charities
    List,

    /// Select a charity (prompts when no id is given)
    Select {
        /// Charity id, e.g. "charity2"
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum StatsAction {
    /// Show conversion counts
    Show,

    /// Export the conversion log as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete every conversion record
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

type Settings = SettingsService<KvSettingsRepository>;
type Stats = StatsService<KvStatsRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let stores = open_stores(&config)
        .await
        .context("Failed to open storage")?;

    let settings = SettingsService::new(Arc::new(KvSettingsRepository::new(
        stores.sync.clone(),
        config.default_affiliate_id.clone(),
    )));
    let stats = StatsService::new(Arc::new(KvStatsRepository::new(stores.local.clone())));

    match cli.command {
        Commands::Settings { action } => handle_settings_action(action, &settings).await?,
        Commands::Charity { action } => handle_charity_action(action, &settings).await?,
        Commands::Stats { action } => handle_stats_action(action, &stats).await?,
        Commands::Rewrite { url, tag } => {
            preview_rewrite(&settings, config.anchor_rewrite_mode, &url, tag).await?
        }
    }

    Ok(())
}

async fn handle_settings_action(action: SettingsAction, settings: &Settings) -> Result<()> {
    match action {
        SettingsAction::Show => show_settings(settings).await?,
        SettingsAction::Enable | SettingsAction::Disable => {
            let enabled = matches!(action, SettingsAction::Enable);
            settings
                .set_enabled(enabled)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update settings: {}", e))?;

            if enabled {
                println!("{}", "✅ Rewriting enabled".green().bold());
            } else {
                println!("{}", "⏸️  Rewriting disabled".yellow().bold());
            }
        }
    }

    Ok(())
}

async fn show_settings(settings: &Settings) -> Result<()> {
    println!("{}", "⚙️  Settings".bright_blue().bold());
    println!();

    let snapshot = settings
        .snapshot()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;

    let status = if snapshot.enabled {
        "ENABLED".green()
    } else {
        "DISABLED".red()
    };
    let charity = settings
        .selected_charity()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?
        .map(|c| c.name)
        .unwrap_or("unknown");

    println!("  Status:       {}", status.bold());
    println!(
        "  Charity:      {} {}",
        charity.cyan(),
        format!("({})", snapshot.selected_charity_id).bright_black()
    );
    println!(
        "  Affiliate id: {}",
        snapshot.affiliate_id.to_string().bright_yellow()
    );
    println!();

    Ok(())
}

async fn handle_charity_action(action: CharityAction, settings: &Settings) -> Result<()> {
    match action {
        CharityAction::List => list_charities(settings).await?,
        CharityAction::Select { id } => select_charity(settings, id).await?,
    }

    Ok(())
}

/// Lists the catalog and marks the current selection.
///
/// # Output Format
///
/// ```text
/// 💝 Charities
///
///   ID         Name                           Tag
///   ─────────────────────────────────────────────────────────
/// * charity1   Global Wildlife Fund           gwf-20
///   charity2   Children's Education           edu-20
/// ```
async fn list_charities(settings: &Settings) -> Result<()> {
    println!("{}", "💝 Charities".bright_blue().bold());
    println!();

    let selected = settings
        .snapshot()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?
        .selected_charity_id;

    println!(
        "  {:<10} {:<30} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Tag".bright_white().bold()
    );
    println!("  {}", "─".repeat(57).bright_black());

    for charity in settings.list_charities() {
        let marker = if charity.id == selected { "*" } else { " " };
        println!(
            "{} {:<10} {:<30} {}",
            marker.green().bold(),
            charity.id.bright_black(),
            charity.name.cyan(),
            charity.affiliate_id.bright_yellow()
        );
    }
    println!();

    Ok(())
}

async fn select_charity(settings: &Settings, id: Option<String>) -> Result<()> {
    let id = match id {
        Some(id) => id,
        None => {
            let charities = settings.list_charities();
            let names: Vec<&str> = charities.iter().map(|c| c.name).collect();
            let index = Select::new()
                .with_prompt("Choose a charity")
                .items(&names)
                .default(0)
                .interact()?;
            charities[index].id.to_string()
        }
    };

    let charity = settings
        .select_charity(&id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to select charity: {}", e))?;

    println!(
        "{} {} {}",
        "✅ Now supporting".green().bold(),
        charity.name.cyan().bold(),
        format!("(tag {})", charity.affiliate_id).bright_black()
    );

    Ok(())
}

async fn handle_stats_action(action: StatsAction, stats: &Stats) -> Result<()> {
    match action {
        StatsAction::Show => show_stats(stats).await?,
        StatsAction::Export { output } => export_stats(stats, output).await?,
        StatsAction::Clear { yes } => clear_stats(stats, yes).await?,
    }

    Ok(())
}

/// Displays conversion counts.
///
/// Shows:
/// - Total number of conversions
/// - Conversions in the last 24 hours
/// - Conversions in the last 7 days
async fn show_stats(stats: &Stats) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = stats
        .summary(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read statistics: {}", e))?;

    println!(
        "  Total:         {}",
        summary.total.to_string().bright_green().bold()
    );
    println!(
        "  Last 24 hours: {}",
        summary.last_24h.to_string().bright_green().bold()
    );
    println!(
        "  Last 7 days:   {}",
        summary.last_week.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn export_stats(stats: &Stats, output: Option<PathBuf>) -> Result<()> {
    let json = stats
        .export_json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to export statistics: {}", e))?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                "✅ Exported to".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

async fn clear_stats(stats: &Stats, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all conversion records?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    stats
        .clear()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to clear statistics: {}", e))?;

    println!("{}", "✅ Statistics cleared".green().bold());

    Ok(())
}

/// Shows both rewrite shapes for `url`: the canonical page form and the
/// anchor form produced under the configured `ANCHOR_REWRITE_MODE`.
async fn preview_rewrite(
    settings: &Settings,
    mode: AnchorRewriteMode,
    url: &str,
    tag: Option<String>,
) -> Result<()> {
    let tag = match tag {
        Some(tag) => AffiliateTag::new(tag).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => {
            settings
                .snapshot()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?
                .affiliate_id
        }
    };

    println!("{}", "🔗 Rewrite preview".bright_blue().bold());
    println!();
    println!("  Input: {}", url.bright_white());
    println!("  Tag:   {}", tag.to_string().bright_yellow());
    println!("  Mode:  {}", mode.to_string().bright_white());
    println!();

    match rewrite_url(url, &tag) {
        Ok(RewriteResult::Rewritten(rewritten)) => println!("  Page:   {}", rewritten.green()),
        Ok(RewriteResult::Unchanged(_)) => println!("  Page:   {}", "unchanged".yellow()),
        Err(e) => println!("  Page:   {}", e.to_string().red()),
    }

    let scanner = LinkScanner::new(tag, mode);
    match scanner.anchor_href(url) {
        Ok(Some(rewritten)) => println!("  Anchor: {}", rewritten.green()),
        Ok(None) => println!("  Anchor: {}", "unchanged".yellow()),
        Err(e) => println!("  Anchor: {}", e.to_string().red()),
    }
    println!();

    Ok(())
}
