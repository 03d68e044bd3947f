//! Detail page enrichment: abstract and publication date.
//!
//! Missing detail content never fails a record; sentinel strings stand in.

use scraper::Html;
use tracing::warn;

use paperboard_shared::PaperRecord;

use crate::adapters::{AbstractLookup, SiteAdapter};

/// Abstract heading present, no paragraph after it.
pub const ABSTRACT_NOT_FOUND: &str = "Abstract not found.";

/// No abstract heading on the page.
pub const ABSTRACT_HEADER_NOT_FOUND: &str = "Abstract header not found.";

/// No "Published on" text on the page.
pub const PUBLISHED_DATE_NOT_FOUND: &str = "Published date not found.";

/// Fill `record`'s abstract and publication date from its parsed detail page.
///
/// The detail page shows only day and month, so `current_year` is appended
/// as-is; papers published in an earlier year get the wrong year.
pub fn enrich_document(
    adapter: &dyn SiteAdapter,
    mut record: PaperRecord,
    doc: &Html,
    current_year: i32,
) -> PaperRecord {
    record.abstract_text = match adapter.abstract_lookup(doc) {
        AbstractLookup::Found(text) => text,
        AbstractLookup::MissingParagraph => {
            warn!(url = %record.url, "abstract heading has no paragraph");
            ABSTRACT_NOT_FOUND.to_string()
        }
        AbstractLookup::MissingHeader => {
            warn!(url = %record.url, "no abstract heading");
            ABSTRACT_HEADER_NOT_FOUND.to_string()
        }
    };

    record.publication_date = match adapter.published_on(doc) {
        Some(day_month) => format!("{day_month} {current_year}"),
        None => {
            warn!(url = %record.url, "no publication date");
            PUBLISHED_DATE_NOT_FOUND.to_string()
        }
    };

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HuggingFaceAdapter;

    fn adapter() -> HuggingFaceAdapter {
        HuggingFaceAdapter::new("https://huggingface.co").unwrap()
    }

    fn record() -> PaperRecord {
        PaperRecord::new("A: foo", "https://huggingface.co/papers/1", 12)
    }

    #[test]
    fn full_detail_page() {
        let doc = Html::parse_document(
            r#"<html><body><main>
                <div class="mb-3">Published on March 3</div>
                <h2>Abstract</h2>
                <p>
                    We present foo.
                </p>
            </main></body></html>"#,
        );

        let enriched = enrich_document(&adapter(), record(), &doc, 2024);
        assert_eq!(enriched.abstract_text, "We present foo.");
        assert_eq!(enriched.publication_date, "March 3 2024");
        assert_eq!(enriched.title(), "A: foo");
    }

    #[test]
    fn heading_without_paragraph() {
        let doc = Html::parse_document("<html><body><h2>Abstract</h2></body></html>");
        let enriched = enrich_document(&adapter(), record(), &doc, 2024);
        assert_eq!(enriched.abstract_text, ABSTRACT_NOT_FOUND);
    }

    #[test]
    fn no_heading_no_date() {
        let doc = Html::parse_document("<html><body><p>Just text</p></body></html>");
        let enriched = enrich_document(&adapter(), record(), &doc, 2024);
        assert_eq!(enriched.abstract_text, ABSTRACT_HEADER_NOT_FOUND);
        assert_eq!(enriched.publication_date, PUBLISHED_DATE_NOT_FOUND);
    }

    #[test]
    fn year_comes_from_the_caller() {
        let doc = Html::parse_document("<html><body><span>Published on Dec 31</span></body></html>");
        let enriched = enrich_document(&adapter(), record(), &doc, 2031);
        assert_eq!(enriched.publication_date, "Dec 31 2031");
    }
}
