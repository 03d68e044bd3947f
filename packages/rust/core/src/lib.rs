//! Pipeline orchestration for Paperboard.
//!
//! This crate ties the scraper and the Notion client together into the
//! end-to-end digest run, and renders Notion pages for the terminal.

pub mod display;
pub mod pipeline;

pub use display::{BlockSource, describe_block, describe_page};
pub use pipeline::{
    ProgressReporter, RunConfig, RunResult, SilentProgress, collect_papers, listing_date,
    run_digest,
};
