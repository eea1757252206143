use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use crate::{
    error::{OrnagenError, Result},
    models::{ImagePayload, ModelEndpoint, UpstreamFailure},
};

/// Appended to every upstream prompt.
const QUALITY_SUFFIX: &str = ", high quality, detailed, professional photography, 8k resolution";

/// Per-status backoff policy, held as data so the fallback pass stays a
/// single interpreter loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts allowed per candidate before it is abandoned.
    pub max_attempts: u32,
    /// Flat wait after a 503 before moving to the next candidate.
    pub model_loading_delay: Duration,
    /// Unit wait for 429; scaled by the attempt number.
    pub rate_limit_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            model_loading_delay: Duration::from_secs(2),
            rate_limit_unit: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Wait, then retry the same candidate.
    Retry(Duration),
    /// Wait, then move to the next candidate.
    Advance(Duration),
    /// Move on immediately, without recording the failure.
    Skip,
    /// Record the failure and move on.
    Record,
}

impl RetryPolicy {
    pub fn action_for(&self, status: u16, attempt: u32) -> StatusAction {
        match status {
            503 => StatusAction::Advance(self.model_loading_delay),
            429 => StatusAction::Retry(self.rate_limit_unit * attempt),
            404 | 410 => StatusAction::Skip,
            _ => StatusAction::Record,
        }
    }
}

#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    endpoints: Vec<ModelEndpoint>,
    api_key: Option<String>,
    policy: RetryPolicy,
}

impl ImageClient {
    pub fn new(
        http: reqwest::Client,
        endpoints: Vec<ModelEndpoint>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoints,
            api_key,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoints(&self) -> &[ModelEndpoint] {
        &self.endpoints
    }

    /// Tries each candidate endpoint in order and returns the first
    /// successful image payload. Backoff and skipping are driven by the
    /// policy table; the pass is bounded by `max_attempts` per candidate.
    pub async fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<ImagePayload> {
        if prompt.trim().is_empty() {
            return Err(OrnagenError::ValidationError("Prompt is required".into()));
        }

        let mut last_failure: Option<UpstreamFailure> = None;

        for endpoint in &self.endpoints {
            let (width, height) = endpoint.clamp(width, height);
            let mut attempt = 1u32;

            'candidate: loop {
                log::info!("🧪 Trying model: {}", endpoint.url);

                let failure = match self.request_once(endpoint, prompt, width, height).await {
                    Ok(payload) => {
                        log::info!(
                            "✅ Image generated by {} ({} bytes)",
                            endpoint.url,
                            payload.bytes.len()
                        );
                        return Ok(payload);
                    }
                    Err(failure) => failure,
                };

                match self.policy.action_for(failure.status, attempt) {
                    StatusAction::Retry(delay) => {
                        last_failure = Some(failure);
                        if attempt >= self.policy.max_attempts {
                            log::warn!(
                                "⚠️  Rate limit retries exhausted for {}",
                                endpoint.url
                            );
                            break 'candidate;
                        }
                        log::warn!(
                            "⏳ Rate limited, waiting {}s... (attempt {}/{})",
                            delay.as_secs(),
                            attempt,
                            self.policy.max_attempts
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    StatusAction::Advance(delay) => {
                        log::info!("Model {} is loading (503), trying next model", endpoint.url);
                        last_failure = Some(failure);
                        tokio::time::sleep(delay).await;
                        break 'candidate;
                    }
                    StatusAction::Skip => {
                        log::debug!("Model {} gone ({}), skipping", endpoint.url, failure.status);
                        break 'candidate;
                    }
                    StatusAction::Record => {
                        log::error!(
                            "❌ Model {} returned {}: {}",
                            endpoint.url,
                            failure.status,
                            failure.message
                        );
                        last_failure = Some(failure);
                        break 'candidate;
                    }
                }
            }
        }

        Err(self.exhausted(last_failure))
    }

    async fn request_once(
        &self,
        endpoint: &ModelEndpoint,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<ImagePayload, UpstreamFailure> {
        let body = json!({
            "inputs": format!("{}{}", prompt, QUALITY_SUFFIX),
            "parameters": {
                "width": width,
                "height": height,
            }
        });

        let mut request = self
            .http
            .post(&endpoint.url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", api_key));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(UpstreamFailure::new(500, e.to_string(), &endpoint.url)),
        };

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Status {}", status));
            return Err(UpstreamFailure::new(status.as_u16(), message, &endpoint.url));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());

        if let Some(mime) = &content_type {
            if !mime.starts_with("image/") {
                return Err(UpstreamFailure::new(
                    status.as_u16(),
                    format!("Invalid image payload: {}", mime),
                    &endpoint.url,
                ));
            }
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(UpstreamFailure::new(status.as_u16(), e.to_string(), &endpoint.url)),
        };
        if bytes.is_empty() {
            return Err(UpstreamFailure::new(
                status.as_u16(),
                "Empty image payload",
                &endpoint.url,
            ));
        }

        Ok(ImagePayload::new(
            bytes.to_vec(),
            content_type.unwrap_or_else(|| "image/png".to_string()),
        ))
    }

    fn exhausted(&self, last_failure: Option<UpstreamFailure>) -> OrnagenError {
        match last_failure {
            Some(failure) if failure.status == 429 => OrnagenError::RateLimited {
                endpoint: failure.endpoint,
                attempts: self.policy.max_attempts,
            },
            Some(failure) if failure.status == 503 => OrnagenError::ModelLoading {
                endpoint: failure.endpoint,
                retry_after_secs: self.policy.model_loading_delay.as_secs(),
            },
            Some(failure) => OrnagenError::UpstreamUnavailable {
                endpoint: failure.endpoint,
                status: failure.status,
                message: failure.message,
            },
            None => OrnagenError::InternalError("No models available".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            model_loading_delay: Duration::ZERO,
            rate_limit_unit: Duration::ZERO,
        }
    }

    fn client_for(server_uri: &str, paths: &[&str]) -> ImageClient {
        let endpoints = paths
            .iter()
            .map(|p| ModelEndpoint::new(format!("{}{}", server_uri, p), 768, 768))
            .collect();
        ImageClient::new(reqwest::Client::new(), endpoints, Some("hf_test".into()))
            .with_policy(instant_policy())
    }

    fn png_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(PNG_STUB.to_vec(), "image/png")
    }

    #[test]
    fn policy_table_maps_statuses() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.action_for(503, 1),
            StatusAction::Advance(Duration::from_secs(2))
        );
        assert_eq!(
            policy.action_for(429, 2),
            StatusAction::Retry(Duration::from_secs(10))
        );
        assert_eq!(policy.action_for(404, 1), StatusAction::Skip);
        assert_eq!(policy.action_for(410, 1), StatusAction::Skip);
        assert_eq!(policy.action_for(500, 1), StatusAction::Record);
    }

    #[tokio::test]
    async fn fallback_chain_returns_first_success() {
        let server = MockServer::start().await;

        // Response sequence across the chain: 503, 429, 410, 200.
        Mock::given(method("POST"))
            .and(path("/m1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/m2"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/m2"))
            .respond_with(ResponseTemplate::new(410))
            .with_priority(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/m3"))
            .respond_with(png_response())
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/m4"))
            .respond_with(png_response())
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &["/m1", "/m2", "/m3", "/m4"]);
        let payload = client.generate("star, ornament", 512, 512).await.unwrap();

        assert_eq!(payload.bytes, PNG_STUB);
        assert_eq!(payload.mime, "image/png");
    }

    #[tokio::test]
    async fn exhaustion_reports_last_endpoint_and_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/m1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("first down"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/m2"))
            .respond_with(ResponseTemplate::new(502).set_body_string("second down"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &["/m1", "/m2"]);
        let err = client.generate("star, ornament", 512, 512).await.unwrap_err();

        match err {
            OrnagenError::UpstreamUnavailable {
                endpoint,
                status,
                message,
            } => {
                assert!(endpoint.ends_with("/m2"));
                assert_eq!(status, 502);
                assert!(message.contains("second down"));
            }
            other => panic!("Expected UpstreamUnavailable, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn rate_limit_surfaces_after_bounded_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/m1"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &["/m1"]);
        let err = client.generate("star, ornament", 512, 512).await.unwrap_err();

        match err {
            OrnagenError::RateLimited { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("Expected RateLimited, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn dimensions_are_clamped_to_endpoint_maxima() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/m1"))
            .and(body_partial_json(serde_json::json!({
                "parameters": { "width": 768, "height": 576 }
            })))
            .respond_with(png_response())
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &["/m1"]);
        // 1024 exceeds the endpoint maximum and must be clamped to 768.
        let payload = client.generate("star, ornament", 1024, 576).await.unwrap();
        assert_eq!(payload.bytes, PNG_STUB);
    }

    #[tokio::test]
    async fn non_image_success_body_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/m1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"{\"ok\":true}".to_vec(), "application/json"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &["/m1"]);
        let err = client.generate("star, ornament", 512, 512).await.unwrap_err();

        match err {
            OrnagenError::UpstreamUnavailable { status, message, .. } => {
                assert_eq!(status, 200);
                assert!(message.contains("Invalid image payload"));
            }
            other => panic!("Expected UpstreamUnavailable, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_any_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(png_response())
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &["/m1"]);
        let err = client.generate("   ", 512, 512).await.unwrap_err();
        assert!(matches!(err, OrnagenError::ValidationError(_)));
    }
}
