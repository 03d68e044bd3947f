//! Notion REST client: publish paper toggles and read pages back.
//!
//! Only the handful of endpoints Paperboard needs are wrapped: retrieve a
//! page, list and append block children, query a database and create a
//! database page. Every request carries the integration token and the
//! configured `Notion-Version`.

mod blocks;

use std::time::Duration;

use paperboard_shared::{NotionConfig, NotionId, PaperRecord, PaperboardError, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

pub use blocks::{
    Annotations, Block, BlockContent, Link, MAX_TEXT_LEN, NewBlock, RichText, RichTextBody,
    TEXT_BLOCK_TYPES, TextContent, paper_abstract, paper_toggle,
};

/// Largest page size the API accepts.
const MAX_PAGE_SIZE: usize = 100;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("Paperboard/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A page as returned by `GET /pages/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub last_edited_time: String,
    #[serde(default)]
    pub properties: Value,
}

impl NotionPage {
    /// Plain text of the page title.
    ///
    /// Workspace pages keep it under `properties.title`; database pages use
    /// whichever property has type `title`.
    pub fn title(&self) -> Option<String> {
        let property = self.properties.get("title").or_else(|| {
            self.properties
                .as_object()?
                .values()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("title"))
        })?;

        let text: String = property
            .get("title")?
            .as_array()?
            .iter()
            .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
            .collect();
        Some(text)
    }
}

/// One page of a cursor-paginated list.
#[derive(Debug, Deserialize)]
struct ListPage<T> {
    results: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Error body the API sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated Notion API client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    api_base: String,
}

impl NotionClient {
    /// Build a client for `settings.api_base` authenticated with `token`.
    pub fn new(settings: &NotionConfig, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| PaperboardError::config("Notion token contains invalid characters"))?;
        headers.insert(AUTHORIZATION, bearer);
        let version = HeaderValue::from_str(&settings.api_version).map_err(|_| {
            PaperboardError::config(format!("invalid Notion API version: {}", settings.api_version))
        })?;
        headers.insert("notion-version", version);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| PaperboardError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Retrieve a page's metadata and properties.
    #[instrument(skip_all, fields(page = %page_id))]
    pub async fn get_page(&self, page_id: &NotionId) -> Result<NotionPage> {
        let url = format!("{}/pages/{page_id}", self.api_base);
        self.send(self.client.get(&url), &url).await
    }

    /// All children of a block (or page), following pagination to the end.
    #[instrument(skip_all, fields(block = block_id))]
    pub async fn block_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let url = format!("{}/blocks/{block_id}/children", self.api_base);
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("page_size", MAX_PAGE_SIZE.to_string())]);
            if let Some(c) = &cursor {
                request = request.query(&[("start_cursor", c)]);
            }

            let page: ListPage<Block> = self.send(request, &url).await?;
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = blocks.len(), "block children fetched");
        Ok(blocks)
    }

    /// Append `children` under `parent_id`; returns the created blocks.
    #[instrument(skip_all, fields(parent = parent_id, count = children.len()))]
    pub async fn append_children(
        &self,
        parent_id: &str,
        children: &[NewBlock],
    ) -> Result<Vec<Block>> {
        let url = format!("{}/blocks/{parent_id}/children", self.api_base);
        let body = json!({ "children": children });
        let page: ListPage<Block> = self.send(self.client.patch(&url).json(&body), &url).await?;
        Ok(page.results)
    }

    /// Publish one paper: a toggle under the page, then the abstract inside it.
    ///
    /// Returns the toggle's block id.
    #[instrument(skip_all, fields(page = %page_id, url = %record.url))]
    pub async fn append_paper(&self, page_id: &NotionId, record: &PaperRecord) -> Result<String> {
        let created = self
            .append_children(&page_id.to_string(), &[paper_toggle(record)])
            .await?;
        let toggle_id = created
            .into_iter()
            .next()
            .map(|block| block.id)
            .ok_or_else(|| PaperboardError::Notion("append returned no blocks".into()))?;

        self.append_children(&toggle_id, &[paper_abstract(record)])
            .await?;

        info!(toggle = %toggle_id, "paper published");
        Ok(toggle_id)
    }

    /// Query a database.
    ///
    /// With a `limit`, one request of that page size (capped at 100) is sent.
    /// Without one, pages of 100 are fetched until the cursor runs out.
    #[instrument(skip_all, fields(database = %database_id, limit = ?limit))]
    pub async fn query_database(
        &self,
        database_id: &NotionId,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/databases/{database_id}/query", self.api_base);
        let page_size = limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": page_size });
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }

            let page: ListPage<Value> =
                self.send(self.client.post(&url).json(&body), &url).await?;
            rows.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more && limit.is_none() => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = rows.len(), "database queried");
        Ok(rows)
    }

    /// Create a page in a database with the given `properties` object.
    #[instrument(skip_all, fields(database = %database_id))]
    pub async fn create_database_page(
        &self,
        database_id: &NotionId,
        properties: Value,
    ) -> Result<Value> {
        if !properties.is_object() {
            return Err(PaperboardError::validation(
                "database page properties must be a JSON object",
            ));
        }

        let url = format!("{}/pages", self.api_base);
        let body = json!({
            "parent": { "database_id": database_id.to_string() },
            "properties": properties,
            "created_time": chrono::Utc::now().to_rfc3339(),
        });
        self.send(self.client.post(&url).json(&body), &url).await
    }

    /// Send `request` and decode a JSON body; non-2xx becomes a Notion error.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PaperboardError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaperboardError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or(body);
            return Err(PaperboardError::Notion(format!("{url}: HTTP {status}: {detail}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| PaperboardError::Notion(format!("{url}: unexpected response: {e}")))
    }
}
