//! HTTP side of the scraper: fetch listing and detail pages.
//!
//! Harvesting is a single GET. Enrichment issues one GET per record: with the
//! default concurrency of 1 they run one after another in input order, above
//! that they are spawned and bounded by a semaphore. Results always come back
//! in input order.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use reqwest::Client;
use scraper::Html;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument};

use paperboard_shared::{PaperRecord, PaperboardError, Result, SourceConfig};

use crate::adapters::{HuggingFaceAdapter, SiteAdapter};
use crate::enrich::enrich_document;
use crate::harvest::{harvest_document, target_date};

/// User-Agent string for scrape requests.
const USER_AGENT: &str = concat!("Paperboard/", env!("CARGO_PKG_VERSION"));

/// Fetches and parses paper listing and detail pages.
pub struct Scraper {
    client: Client,
    adapter: Arc<dyn SiteAdapter>,
    concurrency: usize,
}

impl Scraper {
    /// Create a scraper for the Hugging Face papers site at `config.base_url`.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let adapter = HuggingFaceAdapter::new(&config.base_url)?;
        Self::with_adapter(config, Arc::new(adapter))
    }

    /// Create a scraper with a custom site adapter.
    pub fn with_adapter(config: &SourceConfig, adapter: Arc<dyn SiteAdapter>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaperboardError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            adapter,
            concurrency: config.enrich_concurrency.max(1) as usize,
        })
    }

    /// Harvest the listing published `days_ago` days before today (local time).
    pub async fn harvest(&self, days_ago: u64) -> Result<Vec<PaperRecord>> {
        let date = target_date(Local::now().date_naive(), days_ago)?;
        self.harvest_date(date).await
    }

    /// Harvest the listing for `date`.
    #[instrument(skip_all, fields(date = %date, site = self.adapter.name()))]
    pub async fn harvest_date(&self, date: NaiveDate) -> Result<Vec<PaperRecord>> {
        let url = self.adapter.listing_url(date)?;
        info!(%url, "fetching listing");

        let body = fetch_html(&self.client, url.as_str()).await?;
        let doc = Html::parse_document(&body);
        let records = harvest_document(self.adapter.as_ref(), &doc)?;

        info!(count = records.len(), "listing harvested");
        Ok(records)
    }

    /// Fetch each record's detail page and fill in abstract and date.
    ///
    /// Any transport failure aborts enrichment; tasks still in flight are
    /// cancelled.
    #[instrument(skip_all, fields(records = records.len(), concurrency = self.concurrency))]
    pub async fn enrich(&self, records: Vec<PaperRecord>) -> Result<Vec<PaperRecord>> {
        let current_year = Local::now().year();

        if self.concurrency == 1 {
            let mut enriched = Vec::with_capacity(records.len());
            for record in records {
                enriched.push(
                    enrich_record(&self.client, self.adapter.as_ref(), record, current_year)
                        .await?,
                );
            }
            info!(count = enriched.len(), "records enriched");
            return Ok(enriched);
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let mut handles = Vec::with_capacity(records.len());
        for record in records {
            let client = self.client.clone();
            let adapter = Arc::clone(&self.adapter);
            let sem = semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| PaperboardError::Network(format!("enrichment cancelled: {e}")))?;
                enrich_record(&client, adapter.as_ref(), record, current_year).await
            }));
        }

        // Awaiting handles in spawn order keeps the output in input order.
        let mut enriched = Vec::with_capacity(handles.len());
        let mut pending = handles.into_iter();
        while let Some(handle) = pending.next() {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PaperboardError::Network(format!("enrichment task failed: {e}"))),
            };
            match outcome {
                Ok(record) => enriched.push(record),
                Err(e) => {
                    pending.for_each(|h| h.abort());
                    return Err(e);
                }
            }
        }

        info!(count = enriched.len(), "records enriched");
        Ok(enriched)
    }
}

/// Fetch one detail page and enrich `record` from it.
async fn enrich_record(
    client: &Client,
    adapter: &dyn SiteAdapter,
    record: PaperRecord,
    current_year: i32,
) -> Result<PaperRecord> {
    let body = fetch_html(client, &record.url).await?;
    let doc = Html::parse_document(&body);
    Ok(enrich_document(adapter, record, &doc, current_year))
}

/// GET `url` and return the body; non-2xx statuses are errors.
async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PaperboardError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PaperboardError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| PaperboardError::Network(format!("{url}: body read failed: {e}")))
}
