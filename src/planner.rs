use async_trait::async_trait;
use std::sync::Arc;

use crate::config::GeminiConfig;
use crate::error::{Result, TravelPlannerError};
use crate::models::{Content, GenerateRequest, GenerationConfig};
use crate::transport::Transport;

/// The two model calls the planner makes. Each returns the raw reply text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate_itinerary(&self, prompt: &str) -> Result<String>;
    async fn generate_currency(&self, prompt: &str) -> Result<String>;
}

pub struct GeminiPlanner {
    tx: Arc<dyn Transport>,
    generation: GenerationConfig,
}

impl GeminiPlanner {
    pub fn new(tx: Arc<dyn Transport>, cfg: &GeminiConfig) -> Self {
        Self {
            tx,
            generation: GenerationConfig {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                max_output_tokens: cfg.max_output_tokens,
            },
        }
    }

    async fn complete(&self, prompt: &str, purpose: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::user(prompt)],
            generation_config: self.generation,
        };

        let response = self.tx.generate(&request).await?;

        match response.first_text() {
            Some(text) => {
                tracing::info!(purpose, chars = text.len(), "Received model reply");
                Ok(text)
            }
            None => {
                let reason = response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".to_string());
                Err(TravelPlannerError::Upstream {
                    status: None,
                    message: format!("Gemini returned no text for {purpose} ({reason})"),
                })
            }
        }
    }
}

#[async_trait]
impl ModelClient for GeminiPlanner {
    async fn generate_itinerary(&self, prompt: &str) -> Result<String> {
        tracing::info!("Requesting itinerary from Gemini");
        self.complete(prompt, "itinerary").await
    }

    async fn generate_currency(&self, prompt: &str) -> Result<String> {
        tracing::info!("Requesting currency information from Gemini");
        self.complete(prompt, "currency").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, GenerateResponse, Part};
    use std::sync::Mutex;

    // Mock Transport for testing
    struct MockTransport {
        responses: Mutex<Vec<GenerateResponse>>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl MockTransport {
        fn new(responses: Vec<GenerateResponse>) -> Self {
            MockTransport {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
            self.seen
                .lock()
                .expect("Mock transport mutex should not be poisoned")
                .push(req.clone());
            let mut responses = self
                .responses
                .lock()
                .expect("Mock transport mutex should not be poisoned");
            responses.pop().ok_or_else(|| {
                TravelPlannerError::Internal("No more mock responses".to_string())
            })
        }
    }

    fn reply(text: &str) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part {
                        text: text.to_string(),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_itinerary_uses_fixed_sampling() {
        let transport = Arc::new(MockTransport::new(vec![reply("{\"recommendation\": \"Fly\"}")]));
        let planner = GeminiPlanner::new(transport.clone(), &GeminiConfig::default());

        let text = planner
            .generate_itinerary("plan my trip")
            .await
            .expect("mock reply");
        assert_eq!(text, "{\"recommendation\": \"Fly\"}");

        let seen = transport.seen.lock().expect("not poisoned");
        assert_eq!(seen.len(), 1);
        let cfg = seen[0].generation_config;
        assert!((cfg.temperature - 0.2).abs() < 1e-6);
        assert!((cfg.top_p - 0.85).abs() < 1e-6);
        assert_eq!(cfg.max_output_tokens, 2048);
        assert_eq!(seen[0].contents[0].parts[0].text, "plan my trip");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_upstream_error() {
        let transport = Arc::new(MockTransport::new(vec![GenerateResponse::default()]));
        let planner = GeminiPlanner::new(transport, &GeminiConfig::default());

        let err = planner
            .generate_currency("currency for Rome")
            .await
            .expect_err("no candidates");
        assert!(matches!(err, TravelPlannerError::Upstream { status: None, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_safety_block_reports_finish_reason() {
        let blocked = GenerateResponse {
            candidates: vec![Candidate {
                content: None,
                finish_reason: Some("SAFETY".to_string()),
            }],
        };
        let transport = Arc::new(MockTransport::new(vec![blocked]));
        let planner = GeminiPlanner::new(transport, &GeminiConfig::default());

        let err = planner.generate_itinerary("x").await.expect_err("blocked");
        assert!(err.to_string().contains("SAFETY"));
    }
}
