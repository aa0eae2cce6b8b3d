use crate::server::{self, AppState};
use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tourscout_core::data::{ContentFilter, Database};
use tourscout_core::report::{ReportFormat, gather_content_report, generate_report};
use tourscout_core::scrape::{ScrapeOptions, ScrapeProgressCallback, run_scrape};
use tourscout_scanner::{Category, Fetcher, SiteType, Source};
use url::Url;

use crate::DEFAULT_DB_DIR;

pub const DB_FILE_NAME: &str = "tourscout.db";

// Helper functions shared by the handlers

/// Expand `~` in the configured directory and append the database file name.
pub fn resolve_db_path(dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(dir);
    Path::new(expanded.as_ref()).join(DB_FILE_NAME)
}

/// Accept only absolute http(s) URLs. Returns the URL as given, trimmed.
pub fn validate_source_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| format!("Invalid URL '{}': {}", trimmed, e))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("Unsupported URL scheme '{}' in '{}'", other, trimmed)),
    }
    if url.host_str().is_none() {
        return Err(format!("URL '{}' has no host", trimmed));
    }

    Ok(trimmed.to_string())
}

/// Normalize a site type tag. Unknown tags are kept and scraped generically.
pub fn parse_site_type(raw: &str) -> Result<(String, SiteType), String> {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() {
        return Err("Site type must not be empty".to_string());
    }
    let site_type = SiteType::from_tag(&tag);
    Ok((tag, site_type))
}

/// Validate and store a new source. Returns the generated id.
pub fn register_source(
    db: &Database,
    name: &str,
    url: &str,
    site_type: &str,
    is_active: bool,
) -> anyhow::Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Source name must not be empty");
    }
    let url = validate_source_url(url).map_err(anyhow::Error::msg)?;
    let (tag, _) = parse_site_type(site_type).map_err(anyhow::Error::msg)?;

    let id = db
        .add_source(name, &url, &tag, is_active)
        .context("Failed to store source")?;
    Ok(id)
}

/// One line of `source list` output, without colors.
pub fn format_source_row(source: &Source) -> String {
    let status = if source.is_active { "active" } else { "inactive" };
    let scraped = source.last_scraped_at.as_deref().unwrap_or("never");
    format!(
        "{}  {:<8} {:<13} {}  {}  (last scraped: {})",
        source.id, status, source.site_type_tag, source.name, source.url, scraped
    )
}

/// Build the `content` filter. Unknown categories are rejected, blank search terms ignored.
pub fn content_filter(
    category: Option<&str>,
    search: Option<&str>,
) -> anyhow::Result<ContentFilter> {
    let mut filter = ContentFilter::default();
    if let Some(raw) = category {
        let category = Category::from_str(raw.trim())
            .with_context(|| format!("Unknown content category '{}'", raw))?;
        filter = filter.category(category);
    }
    if let Some(term) = search {
        filter = filter.search(term);
    }
    Ok(filter)
}

/// Open an existing database, pointing the user at `init` when there is none.
pub fn open_database(db_path: &Path) -> anyhow::Result<Database> {
    if !Database::exists(db_path) {
        bail!(
            "No database found at {}. Run `tourscout init` first.",
            db_path.display()
        );
    }
    Database::new(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

fn db_path_from(args: &ArgMatches) -> PathBuf {
    let dir = args
        .get_one::<String>("db")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DB_DIR);
    resolve_db_path(dir)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn handle_init(args: &ArgMatches) -> anyhow::Result<()> {
    print_divider();
    println!("{}", "  TOURSCOUT INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let force = args.get_flag("force");
    let db_path = match args.get_one::<String>("PATH") {
        Some(dir) => resolve_db_path(dir),
        None => db_path_from(args),
    };
    let config_dir = db_path
        .parent()
        .context("Invalid database path")?
        .to_path_buf();

    println!(
        "{} Target: {}",
        "→".blue(),
        config_dir.display().to_string().bright_white()
    );
    println!();

    if Database::exists(&db_path) {
        let overwrite = if force {
            true
        } else {
            println!("{}", "⚠ WARNING".yellow().bold());
            println!("Database already exists at:");
            println!(
                "  {} {}",
                "•".yellow(),
                db_path.display().to_string().bright_white()
            );
            println!();
            let response = print_prompt("Would you like to overwrite it? [y/N]:")?;
            println!();
            response == "y" || response == "yes"
        };

        if !overwrite {
            println!("{} Keeping existing database", "→".blue());
            return Ok(());
        }

        Database::drop(&db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
        println!("{} Existing database removed", "✓".green().bold());
    }

    println!("{} Creating directory structure...", "→".blue());
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    println!("{} Creating database...", "→".blue());
    Database::new(&db_path).context("Failed to create database")?;

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Database: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    println!(
        "{} Next: {}",
        "ℹ".blue(),
        "tourscout source add --name <NAME> --url <URL> --type official".bright_white()
    );
    println!();
    Ok(())
}

pub fn handle_source_add(args: &ArgMatches) -> anyhow::Result<()> {
    let db = open_database(&db_path_from(args))?;

    let name = args.get_one::<String>("name").context("--name is required")?;
    let url = args.get_one::<String>("url").context("--url is required")?;
    let site_type = args
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("official");
    let is_active = !args.get_flag("inactive");

    let id = register_source(&db, name, url, site_type, is_active)?;
    if SiteType::from_tag(site_type) == SiteType::Generic {
        println!(
            "{} Unknown site type '{}', only generic extraction will run",
            "⚠".yellow().bold(),
            site_type
        );
    }
    println!(
        "{} Registered {} ({})",
        "✓".green().bold(),
        name.bright_white(),
        id.cyan()
    );
    Ok(())
}

pub fn handle_source_list(args: &ArgMatches) -> anyhow::Result<()> {
    let db = open_database(&db_path_from(args))?;
    let sources = db.all_sources().context("Failed to read sources")?;

    if sources.is_empty() {
        println!("No sources registered.");
        return Ok(());
    }

    print_divider();
    println!("{}", "  REGISTERED SOURCES".bright_white().bold());
    print_divider();
    for source in &sources {
        let row = format_source_row(source);
        if source.is_active {
            println!("{}", row);
        } else {
            println!("{}", row.dimmed());
        }
    }
    println!();
    println!("{} source(s)", sources.len().to_string().cyan());
    Ok(())
}

pub fn handle_source_toggle(args: &ArgMatches, is_active: bool) -> anyhow::Result<()> {
    let db = open_database(&db_path_from(args))?;
    let id = args.get_one::<String>("id").context("--id is required")?;

    if !db
        .set_source_active(id, is_active)
        .context("Failed to update source")?
    {
        bail!("No source with id {}", id);
    }

    let state = if is_active { "enabled" } else { "disabled" };
    println!("{} Source {} {}", "✓".green().bold(), id.cyan(), state);
    Ok(())
}

pub async fn handle_scrape(args: &ArgMatches) -> anyhow::Result<()> {
    let db = open_database(&db_path_from(args))?;
    let delay = Duration::from_millis(*args.get_one::<u64>("delay-ms").unwrap_or(&2000));
    let options = ScrapeOptions { delay };
    let fetcher = Fetcher::new().context("Failed to build HTTP client")?;
    let db = Mutex::new(db);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Loading active sources...");

    let spinner_clone = spinner.clone();
    let progress: ScrapeProgressCallback = Arc::new(move |msg: String| {
        spinner_clone.set_message(msg);
    });

    let result = run_scrape(&db, &fetcher, &options, Some(progress)).await;
    spinner.finish_and_clear();
    let summary = result.context("Scrape failed")?;

    print_divider();
    println!("{}", "  SCRAPE COMPLETE".green().bold());
    print_divider();
    println!("{} {}", "✓".green().bold(), summary.message());
    println!(
        "{} Items stored: {}",
        "→".blue(),
        summary.total_items.to_string().cyan()
    );
    println!(
        "{} Sources checked: {}",
        "→".blue(),
        summary.sources_checked.to_string().cyan()
    );
    for site in &summary.sites {
        println!("  {} {}", "•".green(), site.bright_white());
    }
    println!();
    Ok(())
}

pub fn handle_content(args: &ArgMatches) -> anyhow::Result<()> {
    let db = open_database(&db_path_from(args))?;
    let filter = content_filter(
        args.get_one::<String>("category").map(String::as_str),
        args.get_one::<String>("search").map(String::as_str),
    )?;
    let limit = *args.get_one::<usize>("limit").unwrap_or(&20);
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let data = gather_content_report(&db, &filter, limit).context("Failed to read content")?;
    print!("{}", generate_report(&data, format));
    Ok(())
}

pub async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    let db = open_database(&db_path_from(args))?;
    let addr = *args
        .get_one::<SocketAddr>("bind")
        .context("--bind is required")?;
    let delay = Duration::from_millis(*args.get_one::<u64>("delay-ms").unwrap_or(&2000));

    let fetcher = Fetcher::new().context("Failed to build HTTP client")?;
    let state = Arc::new(AppState::new(db, fetcher, ScrapeOptions { delay }));

    println!(
        "{} Serving {} on {}",
        "→".blue(),
        "/scrape-tourism-data".bright_white(),
        format!("http://{}", addr).cyan()
    );
    server::serve(addr, state).await
}
