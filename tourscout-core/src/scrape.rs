use crate::data::Database;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tourscout_scanner::{Fetcher, Source, extract};
use tracing::{error, info, warn};

/// Pause between two consecutive sources.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Options for configuring a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub delay: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to read source registry: {0}")]
    Registry(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeSummary {
    /// Records accepted by successful upserts.
    pub total_items: usize,
    /// Sources that persisted at least one record, in processing order.
    pub sites: Vec<String>,
    /// Active sources visited during the run.
    pub sources_checked: usize,
}

impl ScrapeSummary {
    pub fn message(&self) -> String {
        format!("Successfully scraped data from {} sites", self.sites.len())
    }
}

fn report(progress: &Option<ScrapeProgressCallback>, message: String) {
    if let Some(callback) = progress {
        callback(message);
    }
}

/// Scrape every active source once, strictly one after another.
///
/// Only a registry read failure aborts the run. Fetch, extraction and
/// persistence failures are logged and the source is left out of the summary.
pub async fn run_scrape(
    db: &Mutex<Database>,
    fetcher: &Fetcher,
    options: &ScrapeOptions,
    progress: Option<ScrapeProgressCallback>,
) -> Result<ScrapeSummary, ScrapeError> {
    let sources = {
        let db = db.lock().await;
        db.active_sources()
    };
    let sources = match sources {
        Ok(sources) => sources,
        Err(e) => {
            error!("Error fetching sites: {}", e);
            return Err(ScrapeError::Registry(e));
        }
    };

    info!("Found {} active tourism sites to scrape", sources.len());

    let mut summary = ScrapeSummary {
        sources_checked: sources.len(),
        ..Default::default()
    };

    for (idx, source) in sources.iter().enumerate() {
        if idx > 0 && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }

        report(
            &progress,
            format!(
                "Scraping {}/{}: {} - {}",
                idx + 1,
                sources.len(),
                source.name,
                source.url
            ),
        );

        if let Some(count) = scrape_source(db, fetcher, source).await {
            summary.total_items += count;
            summary.sites.push(source.name.clone());
        }
    }

    info!(
        total_items = summary.total_items,
        sites = summary.sites.len(),
        "Scrape run complete"
    );

    Ok(summary)
}

/// Fetch, extract and persist one source. `None` when nothing was stored.
async fn scrape_source(db: &Mutex<Database>, fetcher: &Fetcher, source: &Source) -> Option<usize> {
    info!("Scraping {} - {}", source.name, source.url);

    let html = match fetcher.fetch(source).await {
        Ok(html) => html,
        Err(e) => {
            warn!(source = %source.name, "Skipping source, fetch failed: {}", e);
            return None;
        }
    };

    let records = match extract(&html, source) {
        Ok(records) => records,
        Err(e) => {
            warn!(source = %source.name, "Extraction failed, treating as empty: {}", e);
            Vec::new()
        }
    };

    if records.is_empty() {
        info!("No content extracted from {}", source.name);
        return None;
    }

    let scraped_at = Utc::now().to_rfc3339();
    let persisted = {
        let db = db.lock().await;
        db.upsert_content(&source.id, &records, &scraped_at)
    };

    match persisted {
        Ok(count) => {
            info!("Successfully scraped {} items from {}", count, source.name);
            Some(count)
        }
        Err(e) => {
            error!("Error inserting content for {}: {}", source.name, e);
            None
        }
    }
}
