use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// Bound used when the caller has no opinion
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(9000);

const USER_AGENT: &str = "gamehub/0.1 (+https://github.com/gamehub/gamehub)";

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HeaderMap,
}

impl FetchOptions {
    /// Add a header; invalid names or values are dropped with a warning
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(mut value)) => {
                value.set_sensitive(true);
                self.headers.insert(name, value);
            }
            _ => warn!(header = name, "Dropping invalid request header"),
        }
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", &format!("Bearer {token}"))
    }
}

/// HTTP GET with an enforced upper time bound
#[derive(Clone)]
pub struct BoundedFetcher {
    client: Client,
}

impl BoundedFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issue a single GET bounded by `timeout`.
    ///
    /// The bound also applies to reading the returned response's body.
    /// Non-success statuses fail with [`FetchError::Remote`]; the body is left
    /// for the caller to decode.
    pub async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
        timeout: Duration,
    ) -> Result<Response> {
        let request = self
            .client
            .get(url)
            .headers(options.headers.clone())
            .timeout(timeout)
            .send();

        let response = match tokio::time::timeout(timeout, request).await {
            Ok(sent) => sent.map_err(|e| classify(url, timeout, e))?,
            Err(_) => return Err(timed_out(url, timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = %status, "Request failed");
            return Err(FetchError::Remote {
                url: url.to_string(),
                status,
            });
        }

        debug!(url, status = %status, "Request succeeded");
        Ok(response)
    }

    /// Issue a single GET and read the whole body, all within `timeout`
    pub async fn fetch_bytes(
        &self,
        url: &str,
        options: &FetchOptions,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let read = async {
            let response = self.fetch(url, options, timeout).await?;
            let body = response
                .bytes()
                .await
                .map_err(|e| classify(url, timeout, e))?;
            Ok::<_, FetchError>(body.to_vec())
        };

        match tokio::time::timeout(timeout, read).await {
            Ok(body) => body,
            Err(_) => Err(timed_out(url, timeout)),
        }
    }
}

fn timed_out(url: &str, timeout: Duration) -> FetchError {
    warn!(url, timeout_ms = timeout.as_millis() as u64, "Request timed out");
    FetchError::Timeout {
        url: url.to_string(),
        after: timeout,
    }
}

fn classify(url: &str, timeout: Duration, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        timed_out(url, timeout)
    } else {
        FetchError::Http(error)
    }
}

impl Default for BoundedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use futures::stream::{self, Stream, StreamExt};

    /// Sends the start of a JSON document and never finishes it
    fn stalled_body() -> impl Stream<Item = std::result::Result<&'static str, std::io::Error>> {
        stream::iter([Ok("{\"data\":")]).chain(stream::pending())
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_router() -> Router {
        Router::new()
            .route("/ok", get(|| async { "hello" }))
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, "nope") }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route("/stalled", get(|| async { Body::from_stream(stalled_body()) }))
            .route(
                "/auth",
                get(|headers: AxumHeaders| async move {
                    headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_string()
                }),
            )
    }

    #[tokio::test]
    async fn test_fetch_success_returns_response() {
        let base = serve(test_router()).await;
        let fetcher = BoundedFetcher::new();

        let response = fetcher
            .fetch(&format!("{base}/ok"), &FetchOptions::default(), DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_remote_error() {
        let base = serve(test_router()).await;
        let fetcher = BoundedFetcher::new();

        let err = fetcher
            .fetch(&format!("{base}/missing"), &FetchOptions::default(), DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let base = serve(test_router()).await;
        let fetcher = BoundedFetcher::new();

        let started = std::time::Instant::now();
        let err = fetcher
            .fetch(
                &format!("{base}/slow"),
                &FetchOptions::default(),
                Duration::from_millis(100),
            )
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_fetch_bytes_reads_body() {
        let base = serve(test_router()).await;

        let body = BoundedFetcher::new()
            .fetch_bytes(&format!("{base}/ok"), &FetchOptions::default(), DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        let base = serve(test_router()).await;
        let fetcher = BoundedFetcher::new();

        let started = std::time::Instant::now();
        let err = fetcher
            .fetch_bytes(
                &format!("{base}/stalled"),
                &FetchOptions::default(),
                Duration::from_millis(200),
            )
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "unexpected error: {err}");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_returned_response_body_is_bounded() {
        let base = serve(test_router()).await;

        let response = BoundedFetcher::new()
            .fetch(
                &format!("{base}/stalled"),
                &FetchOptions::default(),
                Duration::from_millis(200),
            )
            .await
            .unwrap();

        let started = std::time::Instant::now();
        let err = response.bytes().await.unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_fetch_sends_headers() {
        let base = serve(test_router()).await;
        let fetcher = BoundedFetcher::new();

        let options = FetchOptions::default().bearer("secret");
        let response = fetcher
            .fetch(&format!("{base}/auth"), &options, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "Bearer secret");
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = BoundedFetcher::new()
            .fetch(&format!("http://{addr}/"), &FetchOptions::default(), DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[test]
    fn test_invalid_header_is_dropped() {
        let options = FetchOptions::default().header("bad header", "x");
        assert!(options.headers.is_empty());
    }
}
