//! Hugging Face daily papers adapter.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use paperboard_shared::{PaperboardError, Result};

use super::{AbstractLookup, SiteAdapter};

static MAIN_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body main").expect("valid selector"));
static ARTICLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.flex-col").expect("valid selector"));
static UPVOTE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.leading-none").expect("valid selector"));
static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("valid selector"));
static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.cursor-pointer").expect("valid selector"));
static H2_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid selector"));

/// A text node announcing the publication date.
static PUBLISHED_NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Published on\s").expect("valid regex"));

/// Captures the words after "Published on".
static PUBLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Published on ([\w\s]+)").expect("valid regex"));

/// Adapter for `huggingface.co/papers` and its per-paper pages.
pub struct HuggingFaceAdapter {
    base_url: Url,
}

impl HuggingFaceAdapter {
    /// Create an adapter rooted at `base_url` (normally `https://huggingface.co`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            PaperboardError::config(format!("invalid source base_url '{base_url}': {e}"))
        })?;
        Ok(Self { base_url })
    }
}

impl SiteAdapter for HuggingFaceAdapter {
    fn listing_url(&self, date: NaiveDate) -> Result<Url> {
        let mut url = self.base_url.join("/papers").map_err(|e| {
            PaperboardError::validation(format!("cannot build listing URL: {e}"))
        })?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }

    fn articles<'a>(&self, doc: &'a Html) -> Result<Vec<ElementRef<'a>>> {
        let main = doc
            .select(&MAIN_SEL)
            .next()
            .ok_or_else(|| PaperboardError::parse("listing page has no <main> region"))?;
        Ok(main.select(&ARTICLE_SEL).collect())
    }

    fn upvote_text(&self, article: ElementRef<'_>) -> Option<String> {
        article
            .select(&UPVOTE_SEL)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    fn title(&self, article: ElementRef<'_>) -> Option<String> {
        article
            .select(&TITLE_SEL)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    fn detail_url(&self, article: ElementRef<'_>) -> Option<Url> {
        let href = article.select(&LINK_SEL).next()?.value().attr("href")?;
        self.base_url.join(href).ok()
    }

    fn abstract_lookup(&self, doc: &Html) -> AbstractLookup {
        let Some(heading) = doc
            .select(&H2_SEL)
            .find(|h2| h2.text().collect::<String>() == "Abstract")
        else {
            return AbstractLookup::MissingHeader;
        };

        // First <p> after the heading in document order, not just a sibling.
        doc.root_element()
            .descendants()
            .skip_while(|node| *node != *heading)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "p")
            .map(|p| AbstractLookup::Found(p.text().collect::<String>().trim().to_string()))
            .unwrap_or(AbstractLookup::MissingParagraph)
    }

    fn published_on(&self, doc: &Html) -> Option<String> {
        let text = doc
            .root_element()
            .descendants()
            .filter_map(|node| node.value().as_text())
            .find(|text| PUBLISHED_NODE_RE.is_match(text))?;

        PUBLISHED_RE
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
