//! Remote object identifiers.
//!
//! The workspace API addresses pages, blocks and databases by UUID. Users paste those IDs in
//! several shapes, so parsing accepts all of them and normalises to a single representation:
//!
//! - 32 hex characters: `550e8400e29b41d4a716446655440000`
//! - hyphenated: `550e8400-e29b-41d4-a716-446655440000`
//! - a page URL whose last path segment ends in the ID:
//!   `https://www.notion.so/Weekly-Plan-550e8400e29b41d4a716446655440000?pvs=4`
//!
//! Once constructed, a [`NotionId`] always displays in lowercase hyphenated form, which is what
//! the API echoes back in responses.

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const SIMPLE_ID_LEN: usize = 32;
const PAGE_URL_BASE: &str = "https://www.notion.so";

/// Error type for identifier parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier cannot be empty")]
    Empty,
    #[error("not a valid page, block or database ID: '{0}'")]
    Malformed(String),
}

/// A validated remote object identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NotionId(Uuid);

impl NotionId {
    /// Parses any of the accepted identifier shapes.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] for blank input and [`IdError::Malformed`] when no UUID can be
    /// recovered from the input.
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }

        let candidate = last_path_segment(trimmed);
        if let Ok(uuid) = Uuid::try_parse(candidate) {
            return Ok(Self(uuid));
        }

        // URL slugs put the title before the ID: `Weekly-Plan-<32 hex>`.
        let suffix = candidate
            .len()
            .checked_sub(SIMPLE_ID_LEN)
            .and_then(|start| candidate.get(start..));
        if let Some(suffix) = suffix {
            if suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
                if let Ok(uuid) = Uuid::try_parse(suffix) {
                    return Ok(Self(uuid));
                }
            }
        }

        Err(IdError::Malformed(trimmed.to_string()))
    }

    /// The 32 character form without hyphens.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }

    /// Browser URL for the object.
    pub fn page_url(&self) -> String {
        format!("{}/{}", PAGE_URL_BASE, self.simple())
    }
}

fn last_path_segment(input: &str) -> &str {
    let without_query = input
        .split(['?', '#'])
        .next()
        .unwrap_or(input)
        .trim_end_matches('/');
    without_query
        .rsplit('/')
        .next()
        .unwrap_or(without_query)
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for NotionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotionId::parse(s)
    }
}
