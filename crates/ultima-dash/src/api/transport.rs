use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;
use ultima_types::FetchError;

/// Shared HTTP plumbing for every client talking to the orchestrator.
///
/// Each request carries the configured timeout so a hung backend can only
/// hold a refresh cycle for a bounded time.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Network(format!("Invalid API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::Network(format!(
                "API URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
        let url = self.endpoint(segments);
        debug!("HTTP GET: {}", url);
        self.send(self.client.get(url.clone()), &url).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: Option<&B>) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);
        debug!("HTTP POST: {}", url);
        let request = match body {
            Some(body) => self.client.post(url.clone()).json(body),
            None => self.client.post(url.clone()),
        };
        self.send(request, &url).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{} failed: {}", url.path(), e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("{} body read failed: {}", url.path(), e)))?;

        if !status.is_success() {
            let message = error_message(&body);
            return Err(if status == StatusCode::NOT_FOUND {
                FetchError::NotFound(message.unwrap_or_else(|| url.path().to_string()))
            } else {
                FetchError::Http {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::Parse(format!("{}: {}", url.path(), e)))
    }
}

/// Pulls `error` (or `message`) out of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
}
