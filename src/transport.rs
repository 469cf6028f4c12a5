use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::config::Config;
use crate::error::{Result, TravelPlannerError};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::retry::RetryPolicy;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse>;
}

/// Gemini `generateContent` over HTTPS
pub struct GeminiTransport {
    client: Client,
    api_key: String,
    endpoint: String,
    request_timeout: Duration,
    retry: RetryPolicy,
}

impl GeminiTransport {
    /// Fails with a configuration error when no API key is configured
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let api_key = cfg.require_api_key()?.to_string();
        Ok(Self::new(
            api_key,
            &cfg.gemini.base_url,
            &cfg.gemini.model,
            cfg.request_timeout(),
            RetryPolicy::from_config(&cfg.retry),
        ))
    }

    pub fn new(
        api_key: String,
        base_url: &str,
        model: &str,
        request_timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            request_timeout,
            retry,
        }
    }

    async fn attempt(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let send = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(req)
            .send();

        let response = timeout(self.request_timeout, send)
            .await
            .map_err(|_| TravelPlannerError::Timeout(self.request_timeout))??;

        let status = response.status();
        if !status.is_success() {
            // Error bodies get the same per-attempt bound as the headers
            let message = match timeout(self.request_timeout, response.text()).await {
                Ok(Ok(body)) => body,
                Ok(Err(_)) => "Unknown error".to_string(),
                Err(_) => format!(
                    "Unknown error (body not received within {:?})",
                    self.request_timeout
                ),
            };
            return Err(TravelPlannerError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        timeout(self.request_timeout, response.json::<GenerateResponse>())
            .await
            .map_err(|_| TravelPlannerError::Timeout(self.request_timeout))?
            .map_err(|e| TravelPlannerError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Failed to parse Gemini API response: {e}"),
            })
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let max_attempts = self.retry.max_attempts();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.attempt(req).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts < max_attempts => {
                    let delay = self.retry.delay_for(attempts);
                    tracing::warn!(
                        attempt = attempts,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Gemini call failed, retrying: {}",
                        e
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(attempts, "Gemini call failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
