use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_RETRIES, CLIENT_REQUESTS,
    CLIENT_RETRY_BACKOFF,
};
use crate::retry::RetryPolicy;
use crate::types::{ChatCompletion, ChatCompletionParams};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Anything that can turn a chat-completions request into a response.
///
/// [`Client`] is the HTTP implementation; tests substitute scripted ones.
#[async_trait]
pub trait Completions: Send + Sync {
    /// Performs one logical request, including any transport-level retries.
    async fn complete(&self, params: &ChatCompletionParams) -> Result<ChatCompletion>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    authorization: HeaderValue,
    client: ReqwestClient,
    endpoint: Url,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Client {
    /// Create a client from a resolved configuration.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        Self::with_options(
            &config.api_key,
            &config.base_url,
            config.timeout,
            config.retry.clone(),
        )
    }

    /// Create a new client with custom settings.
    ///
    /// `base_url` is the API root, e.g. `https://api.groq.com/openai/v1`;
    /// requests go to `chat/completions` beneath it.
    pub fn with_options(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::configuration("API key contains invalid header characters"))?;
        authorization.set_sensitive(true);

        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(CHAT_COMPLETIONS_PATH)?;

        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            authorization,
            client,
            endpoint,
            timeout,
            retry,
        })
    }

    /// The full URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The retry policy in effect.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|val| val.to_str().ok())
            .map(String::from);

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.trim().parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let error_type = detail.as_ref().and_then(|d| d.error_type.clone());
        let error_message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| error_body.trim().to_string());

        match status_code {
            429 => Error::rate_limit(error_message, retry_after),
            _ => Error::api(status_code, error_type, error_message, request_id),
        }
    }

    fn classify_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(e.to_string(), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    async fn send_once(&self, params: &ChatCompletionParams) -> Result<ChatCompletion> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers())
            .json(params)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_send_error(e))?;
        trace!(bytes = body.len(), "chat completion body received");
        serde_json::from_str::<ChatCompletion>(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Send a chat-completions request, retrying per the configured policy.
    pub async fn send(&self, params: &ChatCompletionParams) -> Result<ChatCompletion> {
        let mut attempt = 0;
        loop {
            CLIENT_REQUESTS.click();
            let start = Instant::now();
            let result = self.send_once(params).await;
            CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

            let err = match result {
                Ok(completion) => {
                    debug!(
                        model = %params.model,
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "chat completion succeeded"
                    );
                    return Ok(completion);
                }
                Err(err) => err,
            };
            CLIENT_REQUEST_ERRORS.click();

            if !self.retry.should_retry(&err, attempt) {
                debug!(attempt, error = %err, "chat completion failed");
                return Err(err);
            }

            let delay = self.retry.delay_for(&err, attempt);
            debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying chat completion"
            );
            CLIENT_REQUEST_RETRIES.click();
            CLIENT_RETRY_BACKOFF.add(delay.as_secs_f64());
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl Completions for Client {
    async fn complete(&self, params: &ChatCompletionParams) -> Result<ChatCompletion> {
        self.send(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let config = ChatConfig::new("test-key");
        let client = Client::new(&config).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(client.timeout, Duration::from_secs(60));
        assert_eq!(client.retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn base_url_with_trailing_slash() {
        let client = Client::with_options(
            "test-key",
            "http://127.0.0.1:9999/v1/",
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url() {
        let err = Client::with_options(
            "test-key",
            "not a url",
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn invalid_api_key() {
        let err = Client::with_options(
            "bad\nkey",
            "http://127.0.0.1:9999/v1",
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn headers_carry_bearer_token() {
        let client = Client::new(&ChatConfig::new("gsk_abc")).unwrap();
        let headers = client.default_headers();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            &HeaderValue::from_static("Bearer gsk_abc")
        );
        assert!(headers.get(header::AUTHORIZATION).unwrap().is_sensitive());
    }
}
