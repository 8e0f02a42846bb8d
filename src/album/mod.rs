//! Album metadata extraction from board entries.
//!
//! Each syndication origin titles its posts differently, so parsing is split
//! into per-origin [`TitleParser`] strategies looked up by the entry's origin
//! URL in an [`OriginRegistry`].

mod dispatch;
mod funkysouls;

pub use dispatch::{OriginRegistry, TitleParser};
pub use funkysouls::{FunkySouls, FUNKYSOULS_ORIGIN};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Structured metadata pulled out of an entry title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumMeta {
    pub artist: String,
    pub title: String,
    /// Not extracted by any current strategy.
    pub release_date: Option<DateTime<Utc>>,
}

/// Why an entry produced no [`AlbumMeta`].
///
/// Both variants concern a single entry; callers usually skip the entry and
/// carry on with the rest of the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown entry origin: {url} ({title:?})")]
    UnsupportedOrigin { url: String, title: String },
    #[error("Could not parse album title {0:?}: unsupported format")]
    MalformedTitle(String),
}
