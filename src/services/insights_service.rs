//! AI insights service - Restock suggestions from an LLM provider.
//!
//! Thin client around the Gemini `generateContent` REST endpoint. The
//! endpoint is disabled (503) when no API key is configured; upstream
//! failures are caught and surfaced as a generic upstream error, never as
//! an internal fault.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AppError, AppResult};

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Fallback shown when the provider returns an empty candidate list.
const EMPTY_INSIGHTS_MESSAGE: &str = "AI insights are unavailable right now.";

/// Insights service trait for dependency injection.
#[async_trait]
pub trait InsightsService: Send + Sync {
    /// Produce short restock advice from an inventory summary
    async fn inventory_insights(&self, summary: &[serde_json::Value]) -> AppResult<String>;
}

/// Gemini-backed implementation of InsightsService.
pub struct GeminiInsights {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiInsights {
    /// Create a new client; `api_key = None` disables the service
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

/// Subset of the Gemini response the service reads.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl InsightsService for GeminiInsights {
    async fn inventory_insights(&self, summary: &[serde_json::Value]) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::UpstreamUnavailable)?;

        let prompt = format!(
            "Analyze this inventory data and give brief restock advice (max 3 points): {}",
            serde_json::to_string(summary)
                .map_err(|e| AppError::internal(format!("Summary serialization error: {}", e)))?
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.7 }
        });

        let response = self
            .http
            .post(GEMINI_ENDPOINT)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AI provider request failed: {}", e);
                AppError::UpstreamFailed(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("AI provider returned {}", status);
            return Err(AppError::UpstreamFailed(format!(
                "upstream returned {}",
                status
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("AI provider response unreadable: {}", e);
            AppError::UpstreamFailed(e.to_string())
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| EMPTY_INSIGHTS_MESSAGE.to_string());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_is_unavailable() {
        let service = GeminiInsights::new(None);
        let result = service.inventory_insights(&[]).await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::UpstreamUnavailable
        ));
    }

    #[test]
    fn response_text_is_extracted() {
        let raw = serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Restock LAP-001" } ] } }
            ]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap();

        assert_eq!(text, "Restock LAP-001");
    }

    #[test]
    fn empty_candidates_parse_cleanly() {
        let parsed: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
