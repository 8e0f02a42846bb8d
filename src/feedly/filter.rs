use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Server-side ordering of a stream listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    NewestFirst,
    OldestFirst,
}

impl Ranking {
    pub fn as_str(self) -> &'static str {
        match self {
            Ranking::NewestFirst => "newest",
            Ranking::OldestFirst => "oldest",
        }
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for one page of a stream.
///
/// Only `continuation` changes between pages of the same listing; the
/// paginator replaces it with whatever token the previous page returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamFilter {
    /// Stream (board, feed, category) identifier. Must be non-empty.
    pub stream_id: String,
    /// Items per page. 0 leaves the page size to the server.
    pub count: u32,
    /// Ordering; `None` leaves it to the server.
    pub ranked: Option<Ranking>,
    /// Only return unread entries.
    pub unread_only: bool,
    /// Lower time bound. Epoch 0 is treated the same as no bound.
    pub newer_than: Option<DateTime<Utc>>,
    /// Opaque cursor from the previous page. Never inspected.
    pub continuation: Option<String>,
}

impl StreamFilter {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            ..Self::default()
        }
    }

    /// Canonical query string for this filter. Keys are emitted in sorted
    /// order so the same filter always encodes to the same string.
    pub fn encode(&self) -> String {
        encode(self)
    }
}

/// Encodes a filter as an `application/x-www-form-urlencoded` query string.
///
/// Unset fields are omitted rather than sent with a default value:
/// `unreadOnly` only appears when true, `newerThan` only for a positive epoch
/// second, `continuation` only when non-empty.
pub fn encode(filter: &StreamFilter) -> String {
    let mut vals: BTreeMap<&str, String> = BTreeMap::new();
    vals.insert("streamId", filter.stream_id.clone());

    if filter.count > 0 {
        vals.insert("count", filter.count.to_string());
    }
    if let Some(ranked) = filter.ranked {
        vals.insert("ranked", ranked.as_str().to_string());
    }
    if filter.unread_only {
        vals.insert("unreadOnly", "1".to_string());
    }
    if let Some(secs) = filter.newer_than.map(|t| t.timestamp()).filter(|s| *s > 0) {
        vals.insert("newerThan", secs.to_string());
    }
    if let Some(token) = filter.continuation.as_deref().filter(|t| !t.is_empty()) {
        vals.insert("continuation", token.to_string());
    }

    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(vals.iter())
        .finish()
}
