use ntn_types::{IdError, NotionId, TextError};
use std::fmt;

/// Which half of a replace operation was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePhase {
    Clear,
    Append,
}

impl fmt::Display for ReplacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacePhase::Clear => f.write_str("clear"),
            ReplacePhase::Append => f.write_str("append"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    #[error(
        "NOTION_TOKEN is not set; create an integration token at https://www.notion.so/my-integrations"
    )]
    MissingToken,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(serde_json::Error),

    #[error("{operation} failed: {message} (status {status}, code {code})")]
    Api {
        operation: &'static str,
        status: u16,
        code: String,
        message: String,
    },
    #[error("{operation} request failed")]
    Http {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to deserialize {operation} response")]
    Deserialization {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize {operation} request")]
    Serialization {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("append stopped after {added} blocks in {chunks} chunks")]
    PartialAppend {
        added: usize,
        chunks: usize,
        #[source]
        source: Box<NotionError>,
    },
    #[error("clear stopped after deleting {deleted} blocks")]
    PartialClear {
        deleted: usize,
        #[source]
        source: Box<NotionError>,
    },
    #[error("replace failed during {phase} after deleting {deleted} and adding {added} blocks")]
    Replace {
        phase: ReplacePhase,
        deleted: usize,
        added: usize,
        #[source]
        source: Box<NotionError>,
    },
    #[error("{operation} on page {page_id} failed")]
    Page {
        page_id: NotionId,
        operation: &'static str,
        #[source]
        source: Box<NotionError>,
    },
}

impl NotionError {
    /// Blocks committed before a chunked append failed, if this error came from one.
    pub fn added_before_failure(&self) -> Option<usize> {
        match self {
            NotionError::PartialAppend { added, .. } => Some(*added),
            NotionError::Replace { added, .. } => Some(*added),
            NotionError::Page { source, .. } => source.added_before_failure(),
            _ => None,
        }
    }

    /// Blocks deleted before a drain failed, if this error came from one.
    pub fn deleted_before_failure(&self) -> Option<usize> {
        match self {
            NotionError::PartialClear { deleted, .. } => Some(*deleted),
            NotionError::Replace { deleted, .. } => Some(*deleted),
            NotionError::Page { source, .. } => source.deleted_before_failure(),
            _ => None,
        }
    }

    pub(crate) fn on_page(self, page_id: NotionId, operation: &'static str) -> Self {
        NotionError::Page {
            page_id,
            operation,
            source: Box::new(self),
        }
    }
}

impl From<IdError> for NotionError {
    fn from(err: IdError) -> Self {
        NotionError::InvalidInput(err.to_string())
    }
}

impl From<TextError> for NotionError {
    fn from(err: TextError) -> Self {
        NotionError::InvalidInput(err.to_string())
    }
}

pub type NotionResult<T> = std::result::Result<T, NotionError>;
