//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use paperboard_core::{
    ProgressReporter, RunConfig, RunResult, SilentProgress, collect_papers, describe_page,
    listing_date, run_digest,
};
use paperboard_notion::NotionClient;
use paperboard_scraper::Scraper;
use paperboard_shared::{
    AppConfig, NotionId, init_config, load_config, resolve_notion_token,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Paperboard: a Notion digest of the day's top Hugging Face papers.
#[derive(Parser)]
#[command(
    name = "paperboard",
    version,
    about = "Post well-upvoted Hugging Face daily papers to a Notion page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Harvest, enrich and publish papers to a Notion page.
    Run {
        /// Notion page id or URL (defaults to notion.default_page_id).
        #[arg(long)]
        page_id: Option<String>,

        /// Listing date as days before today (defaults to source.past_days).
        #[arg(long)]
        past_days: Option<u64>,

        /// Skip printing the page before publishing.
        #[arg(long)]
        no_display: bool,
    },

    /// Harvest and enrich papers without publishing.
    Harvest {
        /// Listing date as days before today (defaults to source.past_days).
        #[arg(long)]
        past_days: Option<u64>,

        /// Print the records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a Notion page and its block tree.
    Show {
        /// Notion page id or URL (defaults to notion.default_page_id).
        #[arg(long)]
        page_id: Option<String>,
    },

    /// Notion database operations.
    Database {
        #[command(subcommand)]
        action: DatabaseAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Database subcommands.
#[derive(Subcommand)]
pub(crate) enum DatabaseAction {
    /// List pages of a database as JSON.
    Query {
        /// Database id or URL.
        #[arg(long)]
        database_id: String,

        /// Return at most this many pages (one request).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a page in a database.
    Add {
        /// Database id or URL.
        #[arg(long)]
        database_id: String,

        /// Page properties as a JSON object.
        #[arg(long)]
        properties: String,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "paperboard=info",
        1 => "paperboard=debug",
        _ => "paperboard=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            page_id,
            past_days,
            no_display,
        } => cmd_run(page_id.as_deref(), past_days, no_display).await,
        Command::Harvest { past_days, json } => cmd_harvest(past_days, json).await,
        Command::Show { page_id } => cmd_show(page_id.as_deref()).await,
        Command::Database { action } => match action {
            DatabaseAction::Query { database_id, limit } => {
                cmd_database_query(&database_id, limit).await
            }
            DatabaseAction::Add {
                database_id,
                properties,
            } => cmd_database_add(&database_id, &properties).await,
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Page id from the flag, else from config.
fn resolve_page_id(flag: Option<&str>, config: &AppConfig) -> Result<NotionId> {
    let raw = flag
        .map(str::to_string)
        .unwrap_or_else(|| config.notion.default_page_id.clone());

    if raw.trim().is_empty() {
        return Err(eyre!(
            "no Notion page given: pass --page-id or set notion.default_page_id in the config file"
        ));
    }

    parse_notion_id(&raw)
}

fn parse_notion_id(raw: &str) -> Result<NotionId> {
    raw.parse()
        .map_err(|e| eyre!("invalid Notion id '{raw}': {e}"))
}

fn notion_client(config: &AppConfig) -> Result<NotionClient> {
    let token = resolve_notion_token(config)?;
    Ok(NotionClient::new(&config.notion, &token)?)
}

async fn print_page(notion: &NotionClient, page_id: &NotionId) -> Result<()> {
    let page = notion.get_page(page_id).await?;
    for line in describe_page(notion, &page).await? {
        println!("{line}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(page_id: Option<&str>, past_days: Option<u64>, no_display: bool) -> Result<()> {
    let config = load_config()?;
    let page_id = resolve_page_id(page_id, &config)?;
    let notion = notion_client(&config)?;
    let scraper = Scraper::new(&config.source)?;

    let run_config = RunConfig {
        page_id,
        past_days: past_days.unwrap_or(config.source.past_days),
    };

    if !no_display {
        print_page(&notion, &page_id).await?;
        println!();
    }

    info!(page = %page_id, past_days = run_config.past_days, "publishing papers");

    let result = {
        let reporter = CliProgress::new();
        run_digest(&scraper, &notion, &run_config, &reporter).await?
    };

    println!();
    println!("  Papers published!");
    println!("  Date:      {}", result.date);
    println!("  Harvested: {}", result.harvested);
    println!("  Published: {}", result.published());
    println!("  Page:      {page_id}");
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_harvest(past_days: Option<u64>, json: bool) -> Result<()> {
    let config = load_config()?;
    let scraper = Scraper::new(&config.source)?;
    let date = listing_date(past_days.unwrap_or(config.source.past_days))?;

    info!(%date, "harvesting papers");

    let papers = if json {
        collect_papers(&scraper, date, &SilentProgress).await?
    } else {
        let reporter = CliProgress::new();
        collect_papers(&scraper, date, &reporter).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&papers)?);
        return Ok(());
    }

    println!("{} papers for {date}", papers.len());
    for paper in &papers {
        println!();
        println!("  Up {} - {} - {}", paper.upvote_count, paper.publication_date, paper.title());
        println!("  {}", paper.url);
        println!("  {}", paper.abstract_text);
    }

    Ok(())
}

async fn cmd_show(page_id: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let page_id = resolve_page_id(page_id, &config)?;
    let notion = notion_client(&config)?;
    print_page(&notion, &page_id).await
}

async fn cmd_database_query(database_id: &str, limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let database_id = parse_notion_id(database_id)?;
    let notion = notion_client(&config)?;

    let rows = notion.query_database(&database_id, limit).await?;
    info!(count = rows.len(), "database pages fetched");
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

async fn cmd_database_add(database_id: &str, properties: &str) -> Result<()> {
    let config = load_config()?;
    let database_id = parse_notion_id(database_id)?;
    let properties: serde_json::Value =
        serde_json::from_str(properties).wrap_err("--properties is not valid JSON")?;
    let notion = notion_client(&config)?;

    let page = notion.create_database_page(&database_id, properties).await?;
    println!("Page created: {}", page["id"].as_str().unwrap_or("?"));
    if let Some(url) = page["url"].as_str() {
        println!("URL: {url}");
    }
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        Self::from_bar(ProgressBar::new_spinner())
    }

    fn from_bar(spinner: ProgressBar) -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

// Clears the spinner on every exit path, including `?` returns.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn paper_published(&self, title: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Publishing [{current}/{total}] {title}"));
    }

    fn done(&self, _result: &RunResult) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "594e4ca3564c44a5aac4778fd06ba679";

    #[test]
    fn page_flag_wins_over_config() {
        let mut config = AppConfig::default();
        config.notion.default_page_id = "00000000000000000000000000000001".into();

        let id = resolve_page_id(Some(PAGE), &config).unwrap();
        assert_eq!(id.to_string(), "594e4ca3-564c-44a5-aac4-778fd06ba679");

        let fallback = resolve_page_id(None, &config).unwrap();
        assert_eq!(fallback.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn missing_page_id_is_an_error() {
        let err = resolve_page_id(None, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--page-id"));
    }

    #[test]
    fn bad_page_id_is_an_error() {
        assert!(resolve_page_id(Some("not-a-page"), &AppConfig::default()).is_err());
    }

    #[test]
    fn dropping_progress_clears_unfinished_spinner() {
        let bar = ProgressBar::hidden();
        let progress = CliProgress::from_bar(bar.clone());
        progress.phase("Harvesting listing");
        assert!(!bar.is_finished());

        drop(progress);
        assert!(bar.is_finished());
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "paperboard", "-vv", "run", "--page-id", PAGE, "--past-days", "5", "--no-display",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Run {
                page_id,
                past_days,
                no_display,
            } => {
                assert_eq!(page_id.as_deref(), Some(PAGE));
                assert_eq!(past_days, Some(5));
                assert!(no_display);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn parses_database_add() {
        let cli = Cli::try_parse_from([
            "paperboard",
            "database",
            "add",
            "--database-id",
            PAGE,
            "--properties",
            r#"{"Name":{"title":[]}}"#,
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Database {
                action: DatabaseAction::Add { .. }
            }
        ));
    }
}
