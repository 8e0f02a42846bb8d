//! Reads a board's entries and turns them into album metadata.
use crate::album::{AlbumMeta, OriginRegistry, ParseError};
use crate::feedly::{
    Entry, FeedlyClient, FeedlyError, PageLimit, PaginationError, Ranking, StreamFilter,
    Transport,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Upper bound on ids per `/v3/entries/.mget` request.
pub const MAX_RESOLVE_BATCH: usize = 1000;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("No board labelled {0:?}")]
    CollectionNotFound(String),
    #[error(transparent)]
    Feedly(#[from] FeedlyError),
}

impl<T: std::fmt::Debug> From<PaginationError<T>> for BoardError {
    fn from(err: PaginationError<T>) -> Self {
        tracing::warn!(
            pages = err.pages,
            discarded = err.partial.len(),
            "Discarding partial board listing"
        );
        BoardError::Feedly(err.into_source())
    }
}

/// How a board's stream is walked.
#[derive(Debug, Clone)]
pub struct BoardQuery {
    pub label: String,
    pub limit: PageLimit,
    pub page_size: u32,
    pub unread_only: bool,
    pub newer_than: Option<DateTime<Utc>>,
    /// Server-side ordering; `None` leaves it to feedly.
    pub ranked: Option<Ranking>,
    /// List ids only and fetch entry bodies in batches afterwards.
    pub resolve_ids: bool,
}

impl BoardQuery {
    pub fn new(label: impl Into<String>, limit: PageLimit) -> Self {
        Self {
            label: label.into(),
            limit,
            page_size: 0,
            unread_only: false,
            newer_than: None,
            ranked: None,
            resolve_ids: false,
        }
    }

    fn filter(&self, stream_id: String) -> StreamFilter {
        StreamFilter {
            count: self.page_size,
            unread_only: self.unread_only,
            newer_than: self.newer_than,
            ranked: self.ranked,
            ..StreamFilter::new(stream_id)
        }
    }
}

/// The instant `hours` before `now`, or `None` when that is outside the
/// range chrono can represent.
pub fn hours_before(now: DateTime<Utc>, hours: i64) -> Option<DateTime<Utc>> {
    chrono::Duration::try_hours(hours).and_then(|d| now.checked_sub_signed(d))
}

/// Result of parsing every entry on a board.
#[derive(Debug, Default)]
pub struct BoardReport {
    /// (entry id, metadata) in stream order.
    pub albums: Vec<(String, AlbumMeta)>,
    /// (entry id, reason) for entries that produced no metadata.
    pub skipped: Vec<(String, ParseError)>,
    /// False if the page limit cut the listing short.
    pub complete: bool,
}

/// Fetches the board's entries.
///
/// Returns the entries and whether the stream was read to its end.
pub async fn fetch_board<T: Transport>(
    client: &FeedlyClient<T>,
    query: &BoardQuery,
) -> Result<(Vec<Entry>, bool), BoardError> {
    let tag = client
        .find_tag(&query.label)
        .await?
        .ok_or_else(|| BoardError::CollectionNotFound(query.label.clone()))?;

    tracing::info!(board = %query.label, stream = %tag.id, "Reading board");
    let filter = query.filter(tag.id);

    if !query.resolve_ids {
        let collected = client.collect_contents(filter, query.limit).await?;
        return Ok((collected.items, collected.exhausted));
    }

    let collected = client.collect_ids(filter, query.limit).await?;
    let mut entries = Vec::with_capacity(collected.items.len());
    for batch in collected.items.chunks(MAX_RESOLVE_BATCH) {
        entries.extend(client.entries(batch).await?);
    }

    // .mget answers in arbitrary order; restore stream order.
    let position: std::collections::HashMap<&str, usize> = collected
        .items
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    entries.sort_by_key(|e| position.get(e.id.as_str()).copied().unwrap_or(usize::MAX));

    Ok((entries, collected.exhausted))
}

/// Runs every entry through the registry. Parse failures are collected,
/// not raised.
pub fn parse_entries(registry: &OriginRegistry, entries: &[Entry]) -> Vec<Result<AlbumMeta, ParseError>> {
    entries.iter().map(|e| registry.dispatch(e)).collect()
}

/// Looks up the board, walks its stream and parses each entry.
pub async fn albums_from_board<T: Transport>(
    client: &FeedlyClient<T>,
    registry: &OriginRegistry,
    query: &BoardQuery,
) -> Result<BoardReport, BoardError> {
    let (entries, complete) = fetch_board(client, query).await?;

    let mut report = BoardReport {
        complete,
        ..BoardReport::default()
    };
    for (entry, parsed) in entries.iter().zip(parse_entries(registry, &entries)) {
        match parsed {
            Ok(meta) => report.albums.push((entry.id.clone(), meta)),
            Err(e) => {
                tracing::warn!(entry = %entry.id, error = %e, "Skipping entry");
                report.skipped.push((entry.id.clone(), e));
            }
        }
    }

    tracing::info!(
        albums = report.albums.len(),
        skipped = report.skipped.len(),
        complete = report.complete,
        "Board parsed"
    );
    Ok(report)
}
