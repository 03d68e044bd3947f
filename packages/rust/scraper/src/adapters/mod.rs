//! Site adapter trait for paper listing and detail pages.
//!
//! Every CSS selector and text pattern that depends on the papers site's
//! markup lives behind [`SiteAdapter`]. The harvester and enricher only see
//! strings and URLs, so a markup change touches one adapter.

mod huggingface;

use chrono::NaiveDate;
use paperboard_shared::Result;
use scraper::{ElementRef, Html};
use url::Url;

pub use huggingface::HuggingFaceAdapter;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Outcome of looking for the abstract on a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractLookup {
    /// Abstract heading and its paragraph were found (trimmed text).
    Found(String),
    /// The heading exists but no paragraph follows it.
    MissingParagraph,
    /// The page has no abstract heading at all.
    MissingHeader,
}

/// Site-specific extraction of listing entries and detail metadata.
///
/// Listing methods return `None` for missing nodes; the harvester decides
/// which absences are fatal.
pub trait SiteAdapter: Send + Sync {
    /// URL of the listing page for `date`.
    fn listing_url(&self, date: NaiveDate) -> Result<Url>;

    /// Article entries of a listing page, in document order.
    /// Fails when the page has no primary content region.
    fn articles<'a>(&self, doc: &'a Html) -> Result<Vec<ElementRef<'a>>>;

    /// Raw upvote text of an article (trimmed).
    fn upvote_text(&self, article: ElementRef<'_>) -> Option<String>;

    /// Title text of an article (trimmed).
    fn title(&self, article: ElementRef<'_>) -> Option<String>;

    /// Absolute detail-page URL of an article.
    fn detail_url(&self, article: ElementRef<'_>) -> Option<Url>;

    /// Locate the abstract on a detail page.
    fn abstract_lookup(&self, doc: &Html) -> AbstractLookup;

    /// Day-and-month text following "Published on", without a year.
    fn published_on(&self, doc: &Html) -> Option<String>;

    /// Human-readable adapter name for tracing.
    fn name(&self) -> &str;
}
