//! Notion block and rich-text models.
//!
//! Incoming blocks keep their type-specific payload as raw JSON; outgoing
//! blocks are limited to the two kinds Paperboard writes (toggle, paragraph).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use paperboard_shared::PaperRecord;

/// Notion rejects text runs longer than this many characters.
pub const MAX_TEXT_LEN: usize = 2000;

/// Block types whose payload carries a `rich_text` array.
pub const TEXT_BLOCK_TYPES: &[&str] = &[
    "paragraph",
    "heading_1",
    "heading_2",
    "heading_3",
    "toggle",
    "numbered_list_item",
    "bulleted_list_item",
];

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// One styled text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default = "text_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    /// Present on responses only.
    #[serde(default, skip_serializing)]
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn text_kind() -> String {
    "text".into()
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl RichText {
    /// An unstyled run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: text_kind(),
            text: Some(TextContent {
                content: content.into(),
                link: None,
            }),
            annotations: None,
            plain_text: None,
        }
    }

    /// Make the run a link to `url`.
    pub fn link(mut self, url: impl Into<String>) -> Self {
        if let Some(text) = self.text.as_mut() {
            text.link = Some(Link { url: url.into() });
        }
        self
    }

    pub fn bold(mut self) -> Self {
        self.annotations.get_or_insert_with(Annotations::default).bold = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.annotations.get_or_insert_with(Annotations::default).color = Some(color.into());
        self
    }

    /// Displayed text: `plain_text` when the API sent it, else the content.
    pub fn content(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or("")
    }

    pub fn link_url(&self) -> Option<&str> {
        self.text.as_ref()?.link.as_ref().map(|l| l.url.as_str())
    }
}

// ---------------------------------------------------------------------------
// Blocks read from the API
// ---------------------------------------------------------------------------

/// A block as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the payload keyed by `kind`.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Block {
    /// Whether this block type carries rich text.
    pub fn is_text(&self) -> bool {
        TEXT_BLOCK_TYPES.contains(&self.kind.as_str())
    }

    /// Rich-text runs of a text block; empty for other types.
    pub fn rich_text(&self) -> Vec<RichText> {
        self.body
            .get(&self.kind)
            .and_then(|payload| payload.get("rich_text"))
            .and_then(|runs| serde_json::from_value(runs.clone()).ok())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Blocks written to the API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RichTextBody {
    pub rich_text: Vec<RichText>,
}

/// Type-specific part of an outgoing block.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Toggle { toggle: RichTextBody },
    Paragraph { paragraph: RichTextBody },
}

/// A block to append.
#[derive(Debug, Clone, Serialize)]
pub struct NewBlock {
    object: &'static str,
    #[serde(flatten)]
    pub content: BlockContent,
}

impl NewBlock {
    pub fn toggle(rich_text: Vec<RichText>) -> Self {
        Self {
            object: "block",
            content: BlockContent::Toggle {
                toggle: RichTextBody { rich_text },
            },
        }
    }

    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Self {
            object: "block",
            content: BlockContent::Paragraph {
                paragraph: RichTextBody { rich_text },
            },
        }
    }
}

/// Toggle heading for a paper: upvotes, date, linked label and description.
pub fn paper_toggle(record: &PaperRecord) -> NewBlock {
    NewBlock::toggle(vec![
        RichText::plain(format!("Up {} - ", record.upvote_count)).color("blue"),
        RichText::plain(format!("{} - ", record.publication_date)),
        RichText::plain(record.label.as_str())
            .link(record.url.as_str())
            .bold()
            .color("orange"),
        RichText::plain(record.description.as_str())
            .link(record.url.as_str())
            .color("orange"),
    ])
}

/// Paragraph nested under the toggle holding the abstract.
///
/// Long abstracts are split over several runs of at most [`MAX_TEXT_LEN`]
/// characters inside the one paragraph.
pub fn paper_abstract(record: &PaperRecord) -> NewBlock {
    NewBlock::paragraph(
        chunk_text(&record.abstract_text, MAX_TEXT_LEN)
            .into_iter()
            .map(RichText::plain)
            .collect(),
    )
}

/// Split `text` into pieces of at most `max_chars` characters.
pub(crate) fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
