//! FHIR REST implementation
//!
//! Talks to any server exposing the FHIR R4 RESTful API (HAPI, Azure Health Data
//! Services, etc.). Resources are posted to the type endpoint and listed through
//! paged searches.

use super::models::{rejection_message, Bundle};
use super::server::{FhirServer, SubmissionStatus};
use crate::config::{FhirConfig, RetryConfig, SecretString};
use crate::core::serialize::FHIR_JSON_CONTENT_TYPE;
use crate::domain::{BridgeError, FhirServerError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Credentials sent with every request
#[derive(Debug, Clone)]
pub enum FhirAuth {
    None,
    Basic {
        username: String,
        password: SecretString,
    },
    Bearer(SecretString),
}

impl FhirAuth {
    /// Selects credentials according to `fhir.auth_type`
    pub fn from_config(config: &FhirConfig) -> Result<Self> {
        match config.auth_type.as_str() {
            "none" => Ok(Self::None),
            "basic" => match (&config.username, &config.password) {
                (Some(username), Some(password)) => Ok(Self::Basic {
                    username: username.clone(),
                    password: password.clone(),
                }),
                _ => Err(BridgeError::Configuration(
                    "basic authentication requires fhir.username and fhir.password".to_string(),
                )),
            },
            "bearer" => config.token.clone().map(Self::Bearer).ok_or_else(|| {
                BridgeError::Configuration(
                    "bearer authentication requires fhir.token".to_string(),
                )
            }),
            other => Err(BridgeError::Configuration(format!(
                "Unsupported auth_type: {other}. Supported: none, basic, bearer"
            ))),
        }
    }

    /// Build authorization header value
    fn header_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Basic { username, password } => {
                let credentials = format!("{username}:{}", password.expose_secret().as_str());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            Self::Bearer(token) => Some(format!("Bearer {}", token.expose_secret().as_str())),
        }
    }
}

/// REST adapter for FHIR servers
pub struct RestFhirServer {
    /// Base URL without trailing slash
    base_url: String,

    /// Shared HTTP client
    client: Client,

    auth: FhirAuth,

    retry: RetryConfig,

    page_size: usize,

    max_pages: usize,
}

impl RestFhirServer {
    /// Creates an adapter around a caller-built HTTP client
    pub fn new(client: Client, config: &FhirConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            auth: FhirAuth::from_config(config)?,
            retry: config.retry.clone(),
            page_size: config.search.page_size,
            max_pages: config.search.max_pages,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth.header_value() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    /// Backoff delay before retry number `attempt` (1-based)
    fn backoff_delay(&self, attempt: usize) -> Duration {
        let factor = self.retry.backoff_multiplier.powi(attempt as i32 - 1);
        let delay_ms = (self.retry.initial_delay_ms as f64 * factor) as u64;
        Duration::from_millis(delay_ms.min(self.retry.max_delay_ms))
    }

    /// Retry a request with exponential backoff while `retryable` holds
    async fn retry_request<F, T, Fut>(
        &self,
        retryable: fn(&FhirServerError) -> bool,
        operation: F,
    ) -> std::result::Result<T, FhirServerError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, FhirServerError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !retryable(&e) {
                        return Err(e);
                    }

                    let delay = self.backoff_delay(attempt);
                    crate::log_retry_attempt!(attempt, self.retry.max_retries, e.to_string());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Resolves a paging link against the base URL
    fn resolve_link(&self, link: &str) -> std::result::Result<String, FhirServerError> {
        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| FhirServerError::InvalidResponse(format!("Invalid base URL: {e}")))?;
        base.join(link)
            .map(String::from)
            .map_err(|e| FhirServerError::InvalidResponse(format!("Invalid paging link '{link}': {e}")))
    }

    async fn fetch_page(&self, url: &str) -> std::result::Result<Bundle, FhirServerError> {
        self.retry_request(FhirServerError::is_retryable, || async {
            let request = self
                .client
                .get(url)
                .header(ACCEPT, FHIR_JSON_CONTENT_TYPE);
            let response = self.authorize(request).send().await.map_err(request_error)?;
            let response = ensure_success(response).await?;

            let bundle: Bundle = response
                .json()
                .await
                .map_err(|e| FhirServerError::InvalidResponse(e.to_string()))?;

            if bundle.resource_type != "Bundle" {
                return Err(FhirServerError::SearchFailed(format!(
                    "Expected a Bundle, got {}",
                    bundle.resource_type
                )));
            }
            Ok(bundle)
        })
        .await
    }
}

/// Maps transport failures without leaking reqwest types
///
/// Only a failure to establish the connection is `ConnectionFailed`; anything
/// later means the request may already have been received.
fn request_error(e: reqwest::Error) -> FhirServerError {
    if e.is_timeout() {
        FhirServerError::Timeout(e.to_string())
    } else if e.is_connect() {
        FhirServerError::ConnectionFailed(e.to_string())
    } else {
        FhirServerError::Interrupted(e.to_string())
    }
}

/// Turns non-2xx responses into client or server errors
async fn ensure_success(response: Response) -> std::result::Result<Response, FhirServerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = rejection_message(&body);
    if status.is_server_error() {
        Err(FhirServerError::ServerError {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(FhirServerError::ClientError {
            status: status.as_u16(),
            message,
        })
    }
}

fn is_connection_failure(e: &FhirServerError) -> bool {
    matches!(e, FhirServerError::ConnectionFailed(_))
}

#[async_trait]
impl FhirServer for RestFhirServer {
    async fn submit(
        &self,
        resource_type: &str,
        body: &str,
    ) -> std::result::Result<SubmissionStatus, FhirServerError> {
        let url = self.endpoint(resource_type);

        tracing::debug!(url = %url, bytes = body.len(), "Posting resource");

        // A POST that reached the server is never repeated
        let response = self
            .retry_request(is_connection_failure, || async {
                let request = self
                    .client
                    .post(&url)
                    .header(CONTENT_TYPE, FHIR_JSON_CONTENT_TYPE)
                    .header(ACCEPT, FHIR_JSON_CONTENT_TYPE)
                    .body(body.to_string());
                self.authorize(request).send().await.map_err(request_error)
            })
            .await?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .or_else(|| response.headers().get("Content-Location"))
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), location = ?location, "Resource accepted");
            return Ok(SubmissionStatus::accepted(status.as_u16(), location));
        }

        let text = response.text().await.unwrap_or_default();
        let message = rejection_message(&text);
        tracing::warn!(status = status.as_u16(), message = %message, "Resource rejected");

        Ok(SubmissionStatus::rejected(status.as_u16(), message))
    }

    async fn search(&self, resource_type: &str) -> std::result::Result<Vec<Value>, FhirServerError> {
        let mut url = format!(
            "{}?_count={}",
            self.endpoint(resource_type),
            self.page_size
        );
        let mut resources = Vec::new();
        let mut pages = 0;

        loop {
            let bundle = self.fetch_page(&url).await?;
            pages += 1;

            let next = bundle.next_url().map(str::to_string);
            let page_resources = bundle.into_resources(resource_type);
            tracing::debug!(
                page = pages,
                count = page_resources.len(),
                "Fetched search page"
            );
            resources.extend(page_resources);

            match next {
                Some(next) if pages < self.max_pages => url = self.resolve_link(&next)?,
                Some(_) => {
                    tracing::warn!(
                        max_pages = self.max_pages,
                        fetched = resources.len(),
                        "Search page limit reached, remaining pages skipped"
                    );
                    break;
                }
                None => break,
            }
        }

        tracing::info!(
            resource_type = resource_type,
            count = resources.len(),
            pages = pages,
            "Search completed"
        );

        Ok(resources)
    }

    async fn health_check(&self) -> std::result::Result<(), FhirServerError> {
        let url = self.endpoint("metadata");

        self.retry_request(FhirServerError::is_retryable, || async {
            let request = self.client.get(&url).header(ACCEPT, FHIR_JSON_CONTENT_TYPE);
            let response = self.authorize(request).send().await.map_err(request_error)?;
            let response = ensure_success(response).await?;

            let statement: Value = response
                .json()
                .await
                .map_err(|e| FhirServerError::InvalidResponse(e.to_string()))?;
            match statement.get("resourceType").and_then(Value::as_str) {
                Some("CapabilityStatement") => Ok(()),
                other => Err(FhirServerError::InvalidResponse(format!(
                    "Expected CapabilityStatement, got {}",
                    other.unwrap_or("no resourceType")
                ))),
            }
        })
        .await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
