//! Paper listing harvester and detail page enricher.
//!
//! This crate provides:
//! - [`adapters`]: site-specific selectors behind the [`SiteAdapter`] trait
//! - [`harvest`]: upvote threshold and title splitting for listing pages
//! - [`enrich`]: abstract and publication date extraction with sentinels
//! - [`engine`]: the [`Scraper`] that fetches pages over HTTP

pub mod adapters;
pub mod engine;
pub mod enrich;
pub mod harvest;

pub use adapters::{AbstractLookup, HuggingFaceAdapter, SiteAdapter};
pub use engine::Scraper;
pub use enrich::{
    ABSTRACT_HEADER_NOT_FOUND, ABSTRACT_NOT_FOUND, PUBLISHED_DATE_NOT_FOUND, enrich_document,
};
pub use harvest::{UPVOTE_THRESHOLD, harvest_document, parse_upvotes, target_date};
