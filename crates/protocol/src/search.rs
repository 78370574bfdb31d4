use serde::{Deserialize, Serialize};

/// One entry of a `/search` response
///
/// The endpoint answers with a JSON array of these, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

/// Parse a `/search` response body
pub fn parse_hits(body: &str) -> serde_json::Result<Vec<SearchHit>> {
    serde_json::from_str(body)
}
