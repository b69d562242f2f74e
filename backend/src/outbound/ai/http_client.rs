//! Reqwest-backed AI adventure source adapter.
//!
//! Owns transport details only: request serialisation, timeout and HTTP
//! error mapping, JSON decoding, and the retry loop. A failure is
//! retryable iff it is a transport/timeout error, a 5xx, or a 429; retries
//! back off exponentially and exhaustion surfaces as `Unavailable`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::ports::{
    AdventureSource, AdventureSourceError, ChoiceEvaluation, EvaluationRequest, GeneratedScenario,
    ScenarioRequest,
};

use super::dto::{
    EvaluateChoiceRequestDto, EvaluateChoiceResponseDto, GenerateAdventureRequestDto,
    GenerateAdventureResponseDto,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

const GENERATE_PATH: &str = "/api/adventure/generate";
const EVALUATE_PATH: &str = "/api/adventure/evaluate";

/// Transport settings for the AI client.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl AiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// AI source adapter performing HTTP POSTs against the AI service.
pub struct AdventureHttpSource {
    client: Client,
    config: AiClientConfig,
}

impl AdventureHttpSource {
    /// Build an adapter with a reqwest client carrying the per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: AiClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AdventureSourceError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let attempts = self.config.max_retries.max(1);
        let mut last_failure = AdventureSourceError::transport("no attempt was made");

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = backoff_delay(self.config.retry_delay, attempt - 1);
                debug!(%url, attempt, ?delay, "retrying AI request after backoff");
                tokio::time::sleep(delay).await;
            }

            match self.client.post(&url).json(body).send().await {
                Err(error) => {
                    // Transport and timeout failures are always retryable.
                    last_failure = map_transport_error(error);
                }
                Ok(response) => {
                    let status = response.status();
                    let bytes = match response.bytes().await {
                        Ok(bytes) => bytes,
                        Err(error) => {
                            last_failure = map_transport_error(error);
                            continue;
                        }
                    };

                    if status.is_success() {
                        return serde_json::from_slice(&bytes).map_err(|error| {
                            AdventureSourceError::decode(format!(
                                "invalid AI response payload: {error}"
                            ))
                        });
                    }

                    let message = status_message(status, &bytes);
                    if !is_retryable_status(status) {
                        return Err(AdventureSourceError::rejected(message));
                    }
                    last_failure = AdventureSourceError::transport(message);
                }
            }
        }

        warn!(%url, attempts, error = %last_failure, "AI request retries exhausted");
        Err(AdventureSourceError::unavailable(format!(
            "{attempts} attempts failed: {last_failure}"
        )))
    }
}

/// Exponential backoff: `retry_delay * 2^attempt` for the 0-based attempt
/// that just failed.
fn backoff_delay(retry_delay: Duration, attempt: u32) -> Duration {
    retry_delay.saturating_mul(2u32.saturating_pow(attempt))
}

/// 5xx and 429 responses may succeed on retry; everything else is final.
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn map_transport_error(error: reqwest::Error) -> AdventureSourceError {
    if error.is_timeout() {
        AdventureSourceError::timeout(error.to_string())
    } else {
        AdventureSourceError::transport(error.to_string())
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl AdventureSource for AdventureHttpSource {
    async fn generate(
        &self,
        request: ScenarioRequest,
    ) -> Result<GeneratedScenario, AdventureSourceError> {
        let dto = GenerateAdventureRequestDto::from(request);
        let response: GenerateAdventureResponseDto = self.post_json(GENERATE_PATH, &dto).await?;
        response.into_domain().map_err(AdventureSourceError::decode)
    }

    async fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<ChoiceEvaluation, AdventureSourceError> {
        let dto = EvaluateChoiceRequestDto::from(request);
        let response: EvaluateChoiceResponseDto = self.post_json(EVALUATE_PATH, &dto).await?;
        response.into_domain().map_err(AdventureSourceError::decode)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the pure retry/mapping helpers; the loop itself is
    //! exercised through these plus the service-level mocks.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Duration::from_secs(1))]
    #[case(1, Duration::from_secs(2))]
    #[case(2, Duration::from_secs(4))]
    fn backoff_doubles_per_attempt(#[case] attempt: u32, #[case] expected: Duration) {
        assert_eq!(backoff_delay(Duration::from_secs(1), attempt), expected);
    }

    #[rstest]
    fn backoff_scales_with_the_configured_delay() {
        assert_eq!(
            backoff_delay(Duration::from_millis(500), 2),
            Duration::from_secs(2)
        );
    }

    #[rstest]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[case(StatusCode::BAD_GATEWAY, true)]
    #[case(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[case(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case(StatusCode::BAD_REQUEST, false)]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, false)]
    #[case(StatusCode::NOT_FOUND, false)]
    fn retryable_statuses_are_5xx_and_429(#[case] status: StatusCode, #[case] expected: bool) {
        assert_eq!(is_retryable_status(status), expected);
    }

    #[rstest]
    fn status_messages_include_a_compact_body_preview() {
        let message = status_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            b"{\n  \"detail\": \"user_age out of range\"\n}",
        );
        assert_eq!(
            message,
            "status 422: { \"detail\": \"user_age out of range\" }"
        );
    }

    #[rstest]
    fn long_bodies_are_truncated_in_the_preview() {
        let body = "x".repeat(500);
        let message = status_message(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        assert!(message.ends_with("..."));
        assert!(message.len() < 200);
    }

    #[rstest]
    fn endpoints_join_without_duplicate_slashes() {
        let source = AdventureHttpSource::new(AiClientConfig::new("http://ai:8000/"))
            .expect("client builds");
        assert_eq!(
            source.endpoint(GENERATE_PATH),
            "http://ai:8000/api/adventure/generate"
        );
    }
}
