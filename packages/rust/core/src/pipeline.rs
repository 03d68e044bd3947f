//! End-to-end digest run: listing → detail pages → Notion page.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use paperboard_notion::NotionClient;
use paperboard_scraper::{Scraper, target_date};
use paperboard_shared::{NotionId, PaperRecord, Result};

/// Configuration for [`run_digest`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Page the paper toggles are appended to.
    pub page_id: NotionId,
    /// Listing date, as days before today.
    pub past_days: u64,
}

/// Result of [`run_digest`].
#[derive(Debug)]
pub struct RunResult {
    /// Listing date that was harvested.
    pub date: NaiveDate,
    /// Records that passed the upvote threshold.
    pub harvested: usize,
    /// Block ids of the created toggles, in publish order.
    pub toggle_ids: Vec<String>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl RunResult {
    pub fn published(&self) -> usize {
        self.toggle_ids.len()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each paper is written to Notion.
    fn paper_published(&self, title: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, result: &RunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn paper_published(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &RunResult) {}
}

/// Listing date `past_days` before today, local time.
pub fn listing_date(past_days: u64) -> Result<NaiveDate> {
    target_date(Local::now().date_naive(), past_days)
}

/// Harvest the listing for `date` and enrich every surviving record.
pub async fn collect_papers(
    scraper: &Scraper,
    date: NaiveDate,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PaperRecord>> {
    progress.phase("Harvesting listing");
    let harvested = scraper.harvest_date(date).await?;

    progress.phase("Fetching paper details");
    scraper.enrich(harvested).await
}

/// Run the full digest.
///
/// 1. Harvest the listing for the configured date
/// 2. Enrich each record from its detail page
/// 3. Append one toggle per record to the Notion page, in listing order
///
/// A Notion failure stops the run; papers already appended stay on the page.
#[instrument(skip_all, fields(page = %config.page_id, past_days = config.past_days))]
pub async fn run_digest(
    scraper: &Scraper,
    notion: &NotionClient,
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunResult> {
    let start = Instant::now();
    let date = listing_date(config.past_days)?;
    info!(%date, "starting digest run");

    let papers = collect_papers(scraper, date, progress).await?;
    let total = papers.len();

    progress.phase("Publishing to Notion");
    let mut toggle_ids = Vec::with_capacity(total);
    for (i, paper) in papers.iter().enumerate() {
        let toggle_id = notion.append_paper(&config.page_id, paper).await?;
        toggle_ids.push(toggle_id);
        progress.paper_published(&paper.title(), i + 1, total);
    }

    let result = RunResult {
        date,
        harvested: total,
        toggle_ids,
        elapsed: start.elapsed(),
    };

    info!(
        date = %result.date,
        published = result.published(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "digest run complete"
    );
    progress.done(&result);

    Ok(result)
}
