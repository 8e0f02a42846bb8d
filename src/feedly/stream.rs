//! Continuation-driven stream pagination.
//!
//! A listing is walked one page at a time. Each page may carry an opaque
//! continuation token; it is copied verbatim into the next request's filter,
//! replacing the previous one. A page without a token ends the listing.
//!
//! The server decides when a listing ends, so [`collect`](FeedlyClient::collect)
//! always takes a [`PageLimit`] as well.
use super::client::FeedlyClient;
use super::filter::StreamFilter;
use super::transport::Transport;
use super::types::{Entry, StreamContents, StreamIds};
use super::FeedlyError;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::marker::PhantomData;
use thiserror::Error;

/// One page of a stream listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamPage<T> {
    pub items: Vec<T>,
    /// Token for the next page; `None` on the last page.
    pub continuation: Option<String>,
}

/// A listing endpoint and the response body it returns.
pub trait StreamShape: DeserializeOwned + Send {
    type Item: Send;

    /// Path segments below the base URL.
    const PATH: &'static [&'static str];

    fn into_page(self) -> StreamPage<Self::Item>;
}

impl StreamShape for StreamIds {
    type Item = String;

    const PATH: &'static [&'static str] = &["v3", "streams", "ids"];

    fn into_page(self) -> StreamPage<String> {
        StreamPage {
            items: self.ids,
            continuation: non_empty(self.continuation),
        }
    }
}

impl StreamShape for StreamContents {
    type Item = Entry;

    const PATH: &'static [&'static str] = &["v3", "streams", "contents"];

    fn into_page(self) -> StreamPage<Entry> {
        StreamPage {
            items: self.items,
            continuation: non_empty(self.continuation),
        }
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

/// Upper bound on how much of a stream [`FeedlyClient::collect`] will read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// Stop after this many pages.
    Pages(usize),
    /// Stop once this many items have been gathered. The last page is cut
    /// down so exactly this many are returned.
    Items(usize),
}

impl PageLimit {
    fn reached(self, pages: usize, items: usize) -> bool {
        match self {
            PageLimit::Pages(max) => pages >= max,
            PageLimit::Items(max) => items >= max,
        }
    }
}

/// Outcome of a successful [`FeedlyClient::collect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub pages: usize,
    /// True if the server signalled the end of the stream; false if the
    /// limit stopped the walk first.
    pub exhausted: bool,
}

/// A page request failed partway through a walk.
///
/// `partial` holds the items of every page that completed before the
/// failure. Nothing from the failing page is included.
#[derive(Debug, Error)]
#[error("Stream pagination aborted after {pages} page(s): {source}")]
pub struct PaginationError<T: Debug> {
    pub pages: usize,
    pub partial: Vec<T>,
    #[source]
    pub source: FeedlyError,
}

impl<T: Debug> PaginationError<T> {
    pub fn into_source(self) -> FeedlyError {
        self.source
    }
}

/// Cursor over the pages of one stream listing.
///
/// Owns the evolving filter; the continuation token is only ever touched
/// here.
pub struct StreamCursor<'a, T, S> {
    client: &'a FeedlyClient<T>,
    filter: StreamFilter,
    pages: usize,
    finished: bool,
    _shape: PhantomData<fn() -> S>,
}

impl<'a, T: Transport, S: StreamShape> StreamCursor<'a, T, S> {
    pub fn new(client: &'a FeedlyClient<T>, filter: StreamFilter) -> Self {
        Self {
            client,
            filter,
            pages: 0,
            finished: false,
            _shape: PhantomData,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// True once a page without a continuation token has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetches the next page, or `Ok(None)` once the stream has ended.
    ///
    /// On error the cursor is left where it was.
    pub async fn next_page(&mut self) -> Result<Option<StreamPage<S::Item>>, FeedlyError> {
        if self.finished {
            return Ok(None);
        }

        let page = self.client.list_page::<S>(&self.filter).await?;
        self.pages += 1;

        tracing::debug!(
            stream = %self.filter.stream_id,
            page = self.pages,
            items = page.items.len(),
            more = page.continuation.is_some(),
            "Fetched stream page"
        );

        match &page.continuation {
            Some(token) => self.filter.continuation = Some(token.clone()),
            None => self.finished = true,
        }

        Ok(Some(page))
    }
}

impl<T: Transport> FeedlyClient<T> {
    /// Starts a cursor over full entries.
    pub fn contents_cursor(&self, filter: StreamFilter) -> StreamCursor<'_, T, StreamContents> {
        StreamCursor::new(self, filter)
    }

    /// Starts a cursor over entry ids.
    pub fn ids_cursor(&self, filter: StreamFilter) -> StreamCursor<'_, T, StreamIds> {
        StreamCursor::new(self, filter)
    }

    /// Walks a stream until it ends or `limit` is hit, concatenating items
    /// in page order.
    ///
    /// An empty `stream_id` fails with [`FeedlyError::InvalidArgument`]
    /// before any request is sent.
    pub async fn collect<S>(
        &self,
        filter: StreamFilter,
        limit: PageLimit,
    ) -> Result<Collected<S::Item>, PaginationError<S::Item>>
    where
        S: StreamShape,
        S::Item: Debug,
    {
        // Checked up front: a zero limit would otherwise return before
        // list_page ever sees the filter.
        if filter.stream_id.is_empty() {
            return Err(PaginationError {
                pages: 0,
                partial: Vec::new(),
                source: FeedlyError::InvalidArgument("no stream id".into()),
            });
        }

        let mut cursor = StreamCursor::<T, S>::new(self, filter);
        let mut items = Vec::new();

        loop {
            if cursor.is_finished() {
                return Ok(Collected {
                    items,
                    pages: cursor.pages(),
                    exhausted: true,
                });
            }
            if limit.reached(cursor.pages(), items.len()) {
                tracing::debug!(
                    pages = cursor.pages(),
                    items = items.len(),
                    ?limit,
                    "Stream limit reached before end of stream"
                );
                return Ok(Collected {
                    items,
                    pages: cursor.pages(),
                    exhausted: false,
                });
            }

            match cursor.next_page().await {
                Ok(Some(page)) => {
                    items.extend(page.items);
                    if let PageLimit::Items(max) = limit {
                        items.truncate(max);
                    }
                }
                Ok(None) => {}
                Err(source) => {
                    return Err(PaginationError {
                        pages: cursor.pages(),
                        partial: items,
                        source,
                    })
                }
            }
        }
    }

    /// [`collect`](Self::collect) over full entries.
    pub async fn collect_contents(
        &self,
        filter: StreamFilter,
        limit: PageLimit,
    ) -> Result<Collected<Entry>, PaginationError<Entry>> {
        self.collect::<StreamContents>(filter, limit).await
    }

    /// [`collect`](Self::collect) over entry ids.
    pub async fn collect_ids(
        &self,
        filter: StreamFilter,
        limit: PageLimit,
    ) -> Result<Collected<String>, PaginationError<String>> {
        self.collect::<StreamIds>(filter, limit).await
    }
}
