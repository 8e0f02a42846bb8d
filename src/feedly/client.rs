use super::filter::StreamFilter;
use super::stream::{StreamPage, StreamShape};
use super::transport::{HttpTransport, Transport};
use super::types::{Entry, Feed, StreamContents, StreamIds, Tag};
use super::FeedlyError;
use url::Url;

pub const DEFAULT_URL: &str = "https://cloud.feedly.com";

/// Typed access to the feedly v3 endpoints.
///
/// Each method is a single request; pagination lives in
/// [`stream`](super::stream).
#[derive(Debug, Clone)]
pub struct FeedlyClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
}

impl<T: Transport> FeedlyClient<T> {
    /// Creates a client rooted at `base_url`.
    ///
    /// The base URL must be HTTPS so the access token never travels in the
    /// clear. Plain HTTP is accepted for localhost only (tests, proxies).
    pub fn new(transport: T, base_url: &str) -> Result<Self, FeedlyError> {
        let base_url = Url::parse(base_url)?;

        if base_url.scheme() != "https" {
            let is_localhost = base_url.scheme() == "http"
                && matches!(base_url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if !is_localhost {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS base URL (HTTPS required except for localhost)");
                return Err(FeedlyError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base_url, "Using non-HTTPS feedly base URL (localhost only)");
        }

        Ok(Self { transport, base_url })
    }

    /// Builds `base/<segments...>`. Each segment is percent-encoded on its
    /// own, so ids containing '/' stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        url
    }

    pub async fn feed(&self, id: &str) -> Result<Feed, FeedlyError> {
        if id.is_empty() {
            return Err(FeedlyError::InvalidArgument("no feed id to fetch".into()));
        }
        self.transport
            .fetch(self.endpoint(&["v3", "feeds", id]))
            .await
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, FeedlyError> {
        self.transport.fetch(self.endpoint(&["v3", "tags"])).await
    }

    /// Looks up a board by its human-readable label. Returns `Ok(None)` when
    /// no tag carries that exact label.
    pub async fn find_tag(&self, label: &str) -> Result<Option<Tag>, FeedlyError> {
        let tags = self.tags().await?;
        Ok(tags
            .into_iter()
            .find(|t| t.label.as_deref() == Some(label)))
    }

    pub async fn entry(&self, id: &str) -> Result<Entry, FeedlyError> {
        if id.is_empty() {
            return Err(FeedlyError::InvalidArgument("no entry id to fetch".into()));
        }
        self.transport
            .fetch(self.endpoint(&["v3", "entries", id]))
            .await
    }

    /// Resolves a batch of entry ids in one round trip.
    ///
    /// The server does not preserve input order; re-key by [`Entry::id`]
    /// when positions matter. Callers are responsible for chunking if the
    /// batch exceeds what the server accepts.
    pub async fn entries(&self, ids: &[String]) -> Result<Vec<Entry>, FeedlyError> {
        if ids.is_empty() {
            return Err(FeedlyError::InvalidArgument("no entry ids to resolve".into()));
        }
        self.transport
            .send(self.endpoint(&["v3", "entries", ".mget"]), ids)
            .await
    }

    /// Fetches a single page of the stream described by `filter`.
    pub async fn list_page<S: StreamShape>(
        &self,
        filter: &StreamFilter,
    ) -> Result<StreamPage<S::Item>, FeedlyError> {
        if filter.stream_id.is_empty() {
            return Err(FeedlyError::InvalidArgument("no stream id".into()));
        }

        let mut url = self.endpoint(S::PATH);
        url.set_query(Some(&filter.encode()));

        let shape: S = self.transport.fetch(url).await?;
        Ok(shape.into_page())
    }

    /// One page of entry ids.
    pub async fn stream_ids(&self, filter: &StreamFilter) -> Result<StreamPage<String>, FeedlyError> {
        self.list_page::<StreamIds>(filter).await
    }

    /// One page of full entries.
    pub async fn stream_contents(
        &self,
        filter: &StreamFilter,
    ) -> Result<StreamPage<Entry>, FeedlyError> {
        self.list_page::<StreamContents>(filter).await
    }
}
