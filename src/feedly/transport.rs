use super::FeedlyError;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

const USER_AGENT: &str = concat!("playlstr/", env!("CARGO_PKG_VERSION"));

/// The two request shapes the feedly client needs from the network.
///
/// Implementations own authentication, timeouts and any retry policy. The
/// client only builds URLs and interprets decoded values.
pub trait Transport: Send + Sync {
    /// GET `url` and decode the JSON body.
    fn fetch<T>(&self, url: Url) -> impl Future<Output = Result<T, FeedlyError>> + Send
    where
        T: DeserializeOwned + Send;

    /// POST `body` as JSON to `url` and decode the JSON response.
    fn send<B, T>(&self, url: Url, body: &B) -> impl Future<Output = Result<T, FeedlyError>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;
}

/// reqwest-backed transport that signs every request with an OAuth token.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    access_token: SecretString,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, access_token: SecretString, timeout: Duration) -> Self {
        Self {
            client,
            access_token,
            timeout,
        }
    }

    async fn execute<T>(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<T, FeedlyError>
    where
        T: DeserializeOwned,
    {
        let request = request
            .header("User-Agent", USER_AGENT)
            .header(
                "Authorization",
                format!("OAuth {}", self.access_token.expose_secret()),
            );

        let bytes = tokio::time::timeout(self.timeout, async move {
            let response = request.send().await.map_err(FeedlyError::Network)?;

            if !response.status().is_success() {
                return Err(FeedlyError::HttpStatus {
                    status: response.status().as_u16(),
                    url: url.to_string(),
                });
            }

            read_limited_bytes(response, MAX_RESPONSE_SIZE).await
        })
        .await
        .map_err(|_| FeedlyError::Timeout(self.timeout))??;

        tracing::trace!(url = %url, bytes = bytes.len(), "Response received");

        serde_json::from_slice(&bytes).map_err(|source| FeedlyError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl Transport for HttpTransport {
    async fn fetch<T>(&self, url: Url) -> Result<T, FeedlyError>
    where
        T: DeserializeOwned + Send,
    {
        let request = self.client.get(url.clone());
        self.execute(request, &url).await
    }

    async fn send<B, T>(&self, url: Url, body: &B) -> Result<T, FeedlyError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let payload = serde_json::to_vec(body).map_err(FeedlyError::Encode)?;
        let request = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .body(payload);
        self.execute(request, &url).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FeedlyError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedlyError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FeedlyError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedlyError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
