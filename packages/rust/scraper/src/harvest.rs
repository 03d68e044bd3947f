//! Listing page harvesting: upvote threshold and record shaping.

use chrono::{Days, NaiveDate};
use scraper::Html;
use tracing::debug;

use paperboard_shared::{PaperRecord, PaperboardError, Result};

use crate::adapters::SiteAdapter;

/// Papers below this many upvotes are never published.
pub const UPVOTE_THRESHOLD: u32 = 8;

/// Listing placeholder shown for papers nobody has upvoted yet.
const NO_UPVOTES: &str = "-";

/// The listing date `days_ago` days before `today`.
pub fn target_date(today: NaiveDate, days_ago: u64) -> Result<NaiveDate> {
    today.checked_sub_days(Days::new(days_ago)).ok_or_else(|| {
        PaperboardError::validation(format!("{days_ago} days before {today} is out of range"))
    })
}

/// Parse listing upvote text; `"-"` means zero.
pub fn parse_upvotes(text: &str) -> Result<u32> {
    if text == NO_UPVOTES {
        return Ok(0);
    }
    text.parse::<u32>()
        .map_err(|_| PaperboardError::parse(format!("upvote count '{text}' is not a number")))
}

/// Turn a parsed listing page into records at or above [`UPVOTE_THRESHOLD`].
///
/// A missing upvote node, a non-numeric count, or a surviving article without
/// title or link fails the whole page.
pub fn harvest_document(adapter: &dyn SiteAdapter, doc: &Html) -> Result<Vec<PaperRecord>> {
    let articles = adapter.articles(doc)?;
    let mut records = Vec::new();

    for (index, article) in articles.into_iter().enumerate() {
        let upvote_text = adapter.upvote_text(article).ok_or_else(|| {
            PaperboardError::parse(format!("article {index} has no upvote count"))
        })?;
        let upvote_count = parse_upvotes(&upvote_text)
            .map_err(|e| PaperboardError::parse(format!("article {index}: {e}")))?;

        if upvote_count < UPVOTE_THRESHOLD {
            debug!(index, upvote_count, "below upvote threshold, skipping");
            continue;
        }

        let title = adapter
            .title(article)
            .ok_or_else(|| PaperboardError::parse(format!("article {index} has no title")))?;
        let url = adapter.detail_url(article).ok_or_else(|| {
            PaperboardError::parse(format!("article {index} has no detail link"))
        })?;

        records.push(PaperRecord::new(&title, url.as_str(), upvote_count));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HuggingFaceAdapter;

    fn adapter() -> HuggingFaceAdapter {
        HuggingFaceAdapter::new("https://huggingface.co").unwrap()
    }

    fn article(upvotes: &str, title: &str, href: &str) -> String {
        format!(
            r#"<article class="relative flex flex-col">
                <div class="flex"><div class="leading-none">{upvotes}</div></div>
                <h3><a class="cursor-pointer" href="{href}">{title}</a></h3>
            </article>"#
        )
    }

    fn listing(articles: &[String]) -> Html {
        Html::parse_document(&format!(
            "<html><body><main><section>{}</section></main></body></html>",
            articles.concat()
        ))
    }

    #[test]
    fn threshold_and_colon_split() {
        let doc = listing(&[
            article("12", "A: foo", "/papers/1"),
            article("-", "B bar", "/papers/2"),
            article("8", "C: baz", "/papers/3"),
        ]);

        let records = harvest_document(&adapter(), &doc).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].label, "A:");
        assert_eq!(records[0].description, " foo");
        assert_eq!(records[0].upvote_count, 12);
        assert_eq!(records[0].url, "https://huggingface.co/papers/1");

        assert_eq!(records[1].label, "C:");
        assert_eq!(records[1].description, " baz");
        assert_eq!(records[1].upvote_count, 8);
    }

    #[test]
    fn below_threshold_entries_are_dropped() {
        let doc = listing(&[
            article("7", "Seven", "/papers/7"),
            article("0", "Zero", "/papers/0"),
            article("31", "Popular", "/papers/31"),
        ]);

        let records = harvest_document(&adapter(), &doc).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| r.upvote_count >= UPVOTE_THRESHOLD));
        assert_eq!(records[0].label, "");
        assert_eq!(records[0].description, "Popular");
    }

    #[test]
    fn missing_upvote_node_fails_the_page() {
        let doc = listing(&[
            article("12", "A: foo", "/papers/1"),
            r#"<article class="flex-col"><h3>No votes</h3></article>"#.to_string(),
        ]);

        let err = harvest_document(&adapter(), &doc).unwrap_err();
        assert!(matches!(err, PaperboardError::Parse { .. }));
        assert!(err.to_string().contains("article 1"));
    }

    #[test]
    fn non_numeric_upvotes_fail_instead_of_zeroing() {
        let doc = listing(&[article("lots", "A: foo", "/papers/1")]);
        let err = harvest_document(&adapter(), &doc).unwrap_err();
        assert!(err.to_string().contains("'lots' is not a number"));
    }

    #[test]
    fn skipped_article_may_lack_title() {
        let doc = listing(&[
            r#"<article class="flex-col"><div class="leading-none">-</div></article>"#.to_string(),
            article("9", "Kept", "/papers/9"),
        ]);
        let records = harvest_document(&adapter(), &doc).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn surviving_article_without_link_fails() {
        let doc = listing(&[
            r#"<article class="flex-col"><div class="leading-none">20</div><h3>Orphan</h3></article>"#
                .to_string(),
        ]);
        let err = harvest_document(&adapter(), &doc).unwrap_err();
        assert!(err.to_string().contains("no detail link"));
    }

    #[test]
    fn empty_listing_yields_nothing() {
        let doc = listing(&[]);
        assert!(harvest_document(&adapter(), &doc).unwrap().is_empty());
    }

    #[test]
    fn upvote_parsing() {
        assert_eq!(parse_upvotes("-").unwrap(), 0);
        assert_eq!(parse_upvotes("42").unwrap(), 42);
        assert!(parse_upvotes("").is_err());
        assert!(parse_upvotes("1.5k").is_err());
    }

    #[test]
    fn target_date_counts_back() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            target_date(today, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()
        );
        assert_eq!(target_date(today, 0).unwrap(), today);
        assert!(target_date(today, u64::MAX).is_err());
    }
}
