//! Shared types, error model, and configuration for Paperboard.
//!
//! This crate is the foundation depended on by all other Paperboard crates.
//! It provides:
//! - [`PaperboardError`]: the unified error type
//! - Domain types ([`PaperRecord`], [`NotionId`])
//! - Configuration ([`AppConfig`], [`SourceConfig`], [`NotionConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, NotionConfig, SourceConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_notion_token,
};
pub use error::{PaperboardError, Result};
pub use types::{NotionId, PaperRecord};
