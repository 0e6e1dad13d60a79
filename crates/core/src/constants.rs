//! Constants used throughout the ntn core crate.
//!
//! Remote limits live here so that the drivers and the client agree on them.

/// Default base URL for the workspace REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent in the `Notion-Version` header when none is configured.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Largest page the remote returns for any list or query endpoint.
pub const MAX_PAGE_SIZE: usize = 100;

/// Most children the remote accepts in a single append request.
pub const MAX_CHUNK_SIZE: usize = 100;

/// Property name assumed for a database title when the schema cannot be inspected.
pub const FALLBACK_TITLE_PROPERTY: &str = "Name";
