//! Core domain types for Paperboard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// NotionId
// ---------------------------------------------------------------------------

/// A Notion page, block, or database identifier.
///
/// Notion prints ids both dashed and undashed, and page links end with the
/// undashed id (`https://www.notion.so/Reading-list-594e4ca3...`); all three
/// forms parse to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotionId(pub Uuid);

impl std::fmt::Display for NotionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for NotionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = Uuid::parse_str(trimmed) {
            return Ok(Self(id));
        }

        // Page URL: the id is the last 32 hex chars of the path.
        let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
        let tail = path
            .char_indices()
            .rev()
            .nth(31)
            .map(|(i, _)| &path[i..])
            .unwrap_or(path);
        Ok(Self(Uuid::parse_str(tail)?))
    }
}

// ---------------------------------------------------------------------------
// PaperRecord
// ---------------------------------------------------------------------------

/// One paper taken from the listing page, filled in from its detail page.
///
/// The harvester creates records with an empty `abstract_text` and
/// `publication_date`; the enricher sets both before publishing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Title text up to and including the first colon, or empty.
    pub label: String,
    /// Title text after the first colon, or the whole title.
    pub description: String,
    /// Absolute link to the detail page.
    pub url: String,
    /// Listing upvote count.
    pub upvote_count: u32,
    /// Abstract text or a "not found" sentinel.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Publication date text or a "not found" sentinel.
    pub publication_date: String,
}

impl PaperRecord {
    /// Build a harvested record, splitting `title` at its first colon.
    pub fn new(title: &str, url: impl Into<String>, upvote_count: u32) -> Self {
        let (label, description) = match title.split_once(':') {
            Some((head, tail)) => (format!("{head}:"), tail.to_string()),
            None => (String::new(), title.to_string()),
        };

        Self {
            label,
            description,
            url: url.into(),
            upvote_count,
            abstract_text: String::new(),
            publication_date: String::new(),
        }
    }

    /// The original title (`label` followed by `description`).
    pub fn title(&self) -> String {
        format!("{}{}", self.label, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_title_splits_at_first_colon() {
        let record = PaperRecord::new("A: foo", "https://huggingface.co/papers/1", 12);
        assert_eq!(record.label, "A:");
        assert_eq!(record.description, " foo");
        assert_eq!(record.title(), "A: foo");
    }

    #[test]
    fn only_first_colon_splits() {
        let record = PaperRecord::new("Phi-4: Scaling: More Data", "u", 9);
        assert_eq!(record.label, "Phi-4:");
        assert_eq!(record.description, " Scaling: More Data");
        assert_eq!(record.title(), "Phi-4: Scaling: More Data");
    }

    #[test]
    fn title_without_colon_is_all_description() {
        let record = PaperRecord::new("B bar", "u", 8);
        assert_eq!(record.label, "");
        assert_eq!(record.description, "B bar");
        assert!(record.abstract_text.is_empty());
        assert!(record.publication_date.is_empty());
    }

    #[test]
    fn record_serializes_abstract_field_name() {
        let mut record = PaperRecord::new("C: baz", "u", 8);
        record.abstract_text = "We study baz.".into();
        record.publication_date = "March 3 2024".into();
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["abstract"], "We study baz.");
        assert_eq!(json["upvote_count"], 8);
    }

    #[test]
    fn notion_id_parses_all_forms() {
        let dashed: NotionId = "594e4ca3-564c-44a5-aac4-778fd06ba679".parse().expect("dashed");
        let plain: NotionId = "594e4ca3564c44a5aac4778fd06ba679".parse().expect("plain");
        let link: NotionId = "https://www.notion.so/Reading-list-594e4ca3564c44a5aac4778fd06ba679?pvs=4"
            .parse()
            .expect("link");
        assert_eq!(dashed, plain);
        assert_eq!(plain, link);
        assert_eq!(plain.to_string(), "594e4ca3-564c-44a5-aac4-778fd06ba679");
    }

    #[test]
    fn notion_id_rejects_garbage() {
        assert!("not-an-id".parse::<NotionId>().is_err());
    }
}
