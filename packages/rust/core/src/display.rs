//! Plain-text rendering of a Notion page and its block tree.

use std::future::Future;

use paperboard_notion::{Block, NotionClient, NotionPage};
use paperboard_shared::Result;

/// Anything that can list the children of a block.
pub trait BlockSource: Sync {
    fn children(&self, block_id: &str) -> impl Future<Output = Result<Vec<Block>>> + Send;
}

impl BlockSource for NotionClient {
    fn children(&self, block_id: &str) -> impl Future<Output = Result<Vec<Block>>> + Send {
        self.block_children(block_id)
    }
}

/// Render `page`'s metadata followed by every block, depth-first.
///
/// Nested children of text blocks are indented two spaces per level; other
/// block types print their type only and are not descended into. The walk
/// keeps its own stack, so deep trees cost heap rather than call depth.
pub async fn describe_page<S: BlockSource>(source: &S, page: &NotionPage) -> Result<Vec<String>> {
    let mut lines = vec![
        format!("Page title: {}", page.title().unwrap_or_default()),
        format!("Page ID: {}", page.id),
        format!("Page URL: {}", page.url),
        format!("Last update: {}", page.last_edited_time),
        "Blocks:".to_string(),
    ];

    // (block, index among siblings, depth)
    let mut stack: Vec<(Block, usize, usize)> = source
        .children(&page.id)
        .await?
        .into_iter()
        .enumerate()
        .map(|(i, block)| (block, i, 0))
        .rev()
        .collect();

    while let Some((block, index, depth)) = stack.pop() {
        lines.push(format!("{}{}", "  ".repeat(depth), describe_block(&block, index)));

        if block.has_children && block.is_text() {
            let children = source.children(&block.id).await?;
            stack.extend(
                children
                    .into_iter()
                    .enumerate()
                    .map(|(i, child)| (child, i, depth + 1))
                    .rev(),
            );
        }
    }

    Ok(lines)
}

/// One line for a block: its text and link targets, or just its type.
pub fn describe_block(block: &Block, index: usize) -> String {
    if !block.is_text() {
        return format!("other: {}", block.kind);
    }

    let runs = block.rich_text();
    let text: String = runs.iter().map(|run| run.content()).collect();
    let mut urls: Vec<&str> = Vec::new();
    for url in runs.iter().filter_map(|run| run.link_url()) {
        if !urls.contains(&url) {
            urls.push(url);
        }
    }

    if urls.is_empty() {
        format!("block {index} - {}: {text}", block.kind)
    } else {
        format!("block {index} - {}: {text} (url: {})", block.kind, urls.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::{Value, json};

    /// In-memory block tree keyed by parent id.
    #[derive(Default)]
    struct FakeSource {
        tree: HashMap<String, Vec<Value>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with(mut self, parent: &str, blocks: Vec<Value>) -> Self {
            self.tree.insert(parent.to_string(), blocks);
            self
        }
    }

    impl BlockSource for FakeSource {
        fn children(&self, block_id: &str) -> impl Future<Output = Result<Vec<Block>>> + Send {
            self.calls.lock().unwrap().push(block_id.to_string());
            let blocks = self
                .tree
                .get(block_id)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect();
            std::future::ready(Ok(blocks))
        }
    }

    fn text_block(id: &str, kind: &str, text: &str, has_children: bool) -> Value {
        json!({
            "id": id,
            "type": kind,
            "has_children": has_children,
            kind: { "rich_text": [{ "type": "text", "text": { "content": text }, "plain_text": text }] }
        })
    }

    fn page() -> NotionPage {
        serde_json::from_value(json!({
            "id": "page",
            "url": "https://www.notion.so/page",
            "last_edited_time": "2024-03-05T10:00:00.000Z",
            "properties": { "title": { "type": "title", "title": [{ "plain_text": "Reading list" }] } }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn renders_nested_blocks_depth_first() {
        let source = FakeSource::default()
            .with(
                "page",
                vec![
                    text_block("t1", "toggle", "First", true),
                    json!({ "id": "d1", "type": "divider", "has_children": false, "divider": {} }),
                    text_block("h1", "heading_2", "Later", false),
                ],
            )
            .with(
                "t1",
                vec![
                    text_block("p1", "paragraph", "Inner", true),
                    text_block("p2", "paragraph", "Sibling", false),
                ],
            )
            .with("p1", vec![text_block("b1", "bulleted_list_item", "Deep", false)]);

        let lines = describe_page(&source, &page()).await.unwrap();

        assert_eq!(
            lines,
            [
                "Page title: Reading list",
                "Page ID: page",
                "Page URL: https://www.notion.so/page",
                "Last update: 2024-03-05T10:00:00.000Z",
                "Blocks:",
                "block 0 - toggle: First",
                "  block 0 - paragraph: Inner",
                "    block 0 - bulleted_list_item: Deep",
                "  block 1 - paragraph: Sibling",
                "other: divider",
                "block 2 - heading_2: Later",
            ]
        );
        assert_eq!(*source.calls.lock().unwrap(), ["page", "t1", "p1"]);
    }

    #[tokio::test]
    async fn non_text_blocks_are_not_descended() {
        let source = FakeSource::default()
            .with(
                "page",
                vec![
                    json!({ "id": "c1", "type": "column_list", "has_children": true, "column_list": {} }),
                    text_block("p1", "paragraph", "After", false),
                ],
            )
            .with("c1", vec![text_block("hidden", "paragraph", "Inside column", false)]);

        let lines = describe_page(&source, &page()).await.unwrap();

        assert_eq!(&lines[5..], ["other: column_list", "block 1 - paragraph: After"]);
        assert_eq!(*source.calls.lock().unwrap(), ["page"]);
    }

    #[test]
    fn describe_block_lists_link_targets_once() {
        let block: Block = serde_json::from_value(json!({
            "id": "t",
            "type": "toggle",
            "has_children": true,
            "toggle": { "rich_text": [
                { "type": "text", "text": { "content": "Up 12 - " } },
                { "type": "text", "text": { "content": "A:", "link": { "url": "https://x/1" } } },
                { "type": "text", "text": { "content": " foo", "link": { "url": "https://x/1" } } }
            ] }
        }))
        .unwrap();

        assert_eq!(
            describe_block(&block, 3),
            "block 3 - toggle: Up 12 - A: foo (url: https://x/1)"
        );
    }
}
