//! # ntn Core
//!
//! Markdown to block conversion and content operations for a block-based document workspace.
//!
//! This crate contains:
//! - The inline formatter and block classifier (`markdown` → `blocks` + `rich_text`)
//! - The pagination and chunked mutation drivers
//! - Append, clear, replace and read operations over a [`BlockStore`]
//! - [`NotionClient`], the HTTP implementation of that store
//!
//! **No terminal concerns**: argument parsing, prompts and output formatting belong in `ntn-cli`.
//! Configuration is passed in as a [`CoreConfig`]; this crate never reads the environment.

pub mod blocks;
pub mod chunking;
pub mod client;
pub mod config;
pub mod constants;
pub mod content;
pub mod display;
pub mod error;
pub mod markdown;
pub mod pagination;
pub mod payloads;
pub mod rich_text;
pub mod store;

#[cfg(test)]
mod testing;

pub use blocks::{Block, BlockKind};
pub use chunking::submit_in_chunks;
pub use client::{NotionClient, SearchFilter};
pub use config::CoreConfig;
pub use content::{
    append_page_content, clear_page_content, get_page_content, query_database, replace_content,
    replace_page_content, ReplaceOutcome,
};
pub use error::{NotionError, NotionResult, ReplacePhase};
pub use markdown::{to_blocks, Document};
pub use pagination::{drain, paginate, Page};
pub use rich_text::{parse_inline, TextRun, TextStyle};
pub use store::{BlockStore, RemoteBlock};

pub use ntn_types::{NonEmptyText, NotionId};
