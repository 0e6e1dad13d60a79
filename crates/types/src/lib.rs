//! # ntn types
//!
//! Small validated value types shared between the core and the command line:
//! - [`NonEmptyText`] for titles, tokens and block text that must carry content
//! - [`NotionId`] for remote object identifiers supplied by users
//!
//! Both types validate on construction so that malformed input is rejected before any
//! request reaches the remote workspace.

mod id;
mod text;

pub use id::{IdError, NotionId};
pub use text::{NonEmptyText, TextError};
