use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};
use url::Url;

use crate::config::AppConfig;
use crate::{Error, Result};

const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 500;
const PAGE_USER_AGENT: &str = concat!("anchorscroll/", env!("CARGO_PKG_VERSION"));

/// Delay before retry `attempt` (0-based): 500ms, 1000ms, 2000ms, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt))
}

/// Statuses worth retrying
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

fn looks_like_html(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("text/html") || value.contains("application/xhtml+xml")
        })
        .unwrap_or(true)
}

/// A successful response, after redirects
struct FetchResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

/// HTTP fetcher for pages to enhance
pub struct PageFetcher {
    client: Client,
    max_page_bytes: usize,
}

impl PageFetcher {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client =
            Self::build_client(config.fetch.request_timeout_secs, &config.fetch.proxy_url)?;

        Ok(Self {
            client,
            max_page_bytes: config.fetch.max_page_bytes,
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for page fetching");
        }

        builder.build().map_err(Error::Http)
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(PAGE_USER_AGENT));
        headers
    }

    /// Parse and validate a page URL; only http and https are fetchable
    pub fn validate_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(Error::Fetch(format!("Unsupported URL scheme '{}': {}", scheme, url))),
        }
    }

    /// Fetch with retry and exponential backoff
    async fn fetch_with_retry(&self, url: &Url) -> Result<FetchResponse> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            let delay = backoff_delay(attempt);
            tracing::debug!("Fetch attempt {} for {}", attempt + 1, url);

            match self
                .client
                .get(url.clone())
                .headers(Self::build_headers())
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    let headers = response.headers().clone();
                    let final_url = response.url().clone();

                    if is_retryable(status) {
                        tracing::warn!(
                            "Received {} for {}, retrying after {}ms...",
                            status,
                            url,
                            delay.as_millis()
                        );
                        last_error =
                            Some(Error::Fetch(format!("HTTP {} for URL: {}", status, url)));
                    } else {
                        match response.bytes().await {
                            Ok(body) => {
                                return Ok(FetchResponse {
                                    url: final_url,
                                    status,
                                    headers,
                                    body,
                                })
                            }
                            Err(e) => {
                                tracing::warn!("Failed to read response body: {}", e);
                                last_error = Some(Error::Http(e));
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Request failed for {} (attempt {}): {}", url, attempt + 1, e);
                    last_error = Some(Error::Http(e));
                }
            }

            if attempt < MAX_RETRIES - 1 {
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::Fetch(format!("Failed to fetch URL after {} retries: {}", MAX_RETRIES, url))
        }))
    }

    /// Fetch a page, returning the URL it was finally served from and its body
    ///
    /// The returned URL reflects any redirects, so it is the one the page's
    /// relative links resolve against.
    pub async fn fetch(&self, url: &str) -> Result<(Url, String)> {
        let url = Self::validate_url(url)?;

        tracing::info!("Fetching page from: {}", url);

        let response = self.fetch_with_retry(&url).await?;

        if !response.status.is_success() {
            return Err(Error::Fetch(format!(
                "HTTP {} for URL: {}",
                response.status, response.url
            )));
        }

        if response.url != url {
            tracing::debug!(requested = %url, served = %response.url, "Followed redirect");
        }

        self.ensure_content_size(response.body.len(), &response.url)?;

        if !looks_like_html(response.headers.get(CONTENT_TYPE)) {
            tracing::warn!(
                content_type = ?response.headers.get(CONTENT_TYPE),
                "Response for {} does not look like HTML",
                response.url
            );
        }

        let body = String::from_utf8_lossy(&response.body).into_owned();
        Ok((response.url, body))
    }

    fn ensure_content_size(&self, size: usize, url: &Url) -> Result<()> {
        if size > self.max_page_bytes {
            return Err(Error::Fetch(format!(
                "Page too large ({} bytes) for URL: {}",
                size, url
            )));
        }
        Ok(())
    }
}
