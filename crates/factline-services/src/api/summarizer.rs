//! Summarizer stage.
//!
//! `POST /summarize` validates `text` and the optional `isFakeNews` flag,
//! asks the model for a summary of at most fifty words and returns it
//! verbatim.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, info};

use factline_core::{build_summary_prompt, excerpt, optional_flag, required_text};
use factline_llm::{InferenceProvider, OllamaClient};
use factline_types::{Config, PipelineResult, ResultMetadata, Verdict};

use super::monitoring::{StageStats, monitoring_routes};
use super::with_common_layers;
use crate::error::{StageError, UpstreamError};

/// Service name reported by `/health` and `/stats`.
pub const SERVICE_NAME: &str = "news-summarizer";

#[derive(Clone)]
pub struct SummarizerState {
    pub model: Arc<dyn InferenceProvider>,
    pub stats: Arc<StageStats>,
}

impl FromRef<SummarizerState> for Arc<StageStats> {
    fn from_ref(state: &SummarizerState) -> Self {
        state.stats.clone()
    }
}

impl SummarizerState {
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let model = OllamaClient::new(config.summarizer.model.clone(), config.timeout())?;
        Ok(Self {
            model: Arc::new(model),
            stats: Arc::new(StageStats::new(SERVICE_NAME)),
        })
    }
}

pub fn router(state: SummarizerState, body_limit_bytes: usize) -> Router {
    let routes = Router::new()
        .route("/summarize", post(summarize))
        .merge(monitoring_routes::<SummarizerState>())
        .with_state(state);
    with_common_layers(routes, body_limit_bytes)
}

async fn summarize(
    State(state): State<SummarizerState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PipelineResult>, StageError> {
    state.stats.record_request();
    let result = run_summary(&state, payload).await;
    if result.is_err() {
        state.stats.record_failure();
    }
    result.map(Json)
}

async fn run_summary(
    state: &SummarizerState,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<PipelineResult, StageError> {
    let Json(body) = payload?;
    let text = required_text(&body, "text")?;
    let is_fake_news = optional_flag(&body, "isFakeNews")?;
    let started = Instant::now();

    info!(text_len = text.chars().count(), is_fake_news, "summarizing text");

    let prompt = build_summary_prompt(text, is_fake_news);
    let model_id = state.model.default_model().to_string();
    let summary = state.model.infer(&prompt, &model_id).await?;
    debug!(summary_len = summary.chars().count(), "summary complete");

    Ok(PipelineResult {
        text: excerpt(text),
        is_fake_news,
        verdict: Verdict::from_flag(is_fake_news),
        summary,
        metadata: ResultMetadata::now(model_id, started.elapsed().as_millis() as u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use factline_llm::{ChatReply, ChatRequest, InferenceError};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed reply.
    struct StubModel {
        reply: std::result::Result<String, fn() -> InferenceError>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubModel {
        fn answering(text: &str) -> Self {
            Self {
                reply: Ok(text.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> InferenceError) -> Self {
            Self {
                reply: Err(make),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl InferenceProvider for StubModel {
        fn name(&self) -> &str {
            "stub"
        }

        fn default_model(&self) -> &str {
            "stub-model"
        }

        async fn chat(&self, _request: &ChatRequest) -> factline_llm::Result<ChatReply> {
            unreachable!("infer is overridden")
        }

        async fn infer(&self, prompt: &str, _model: &str) -> factline_llm::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn state_with(model: Arc<StubModel>) -> SummarizerState {
        SummarizerState {
            model,
            stats: Arc::new(StageStats::new(SERVICE_NAME)),
        }
    }

    #[tokio::test]
    async fn summary_is_returned_verbatim() {
        let model = Arc::new(StubModel::answering("  Resumo com espaços.  "));
        let state = state_with(model.clone());

        let result = run_summary(
            &state,
            Ok(Json(json!({ "text": "O governo anunciou hoje.", "isFakeNews": true }))),
        )
        .await
        .unwrap();

        assert_eq!(result.summary, "  Resumo com espaços.  ");
        assert!(result.is_fake_news);
        assert_eq!(result.verdict, Verdict::FakeNews);
        assert_eq!(result.metadata.model, "stub-model");

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("isFakeNews:true"));
        assert!(prompts[0].contains("O governo anunciou hoje."));
    }

    #[tokio::test]
    async fn missing_flag_defaults_to_false() {
        let model = Arc::new(StubModel::answering("ok"));
        let result = run_summary(
            &state_with(model),
            Ok(Json(json!({ "text": "O governo anunciou hoje." }))),
        )
        .await
        .unwrap();
        assert!(!result.is_fake_news);
        assert_eq!(result.verdict, Verdict::TrueNews);
    }

    #[tokio::test]
    async fn non_boolean_flag_is_invalid_input() {
        let model = Arc::new(StubModel::answering("ok"));
        let err = run_summary(
            &state_with(model.clone()),
            Ok(Json(json!({ "text": "O governo anunciou hoje.", "isFakeNews": "sim" }))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StageError::InvalidInput(_)));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_failure_counts_as_stage_failure() {
        let model = Arc::new(StubModel::failing(|| InferenceError::Timeout));
        let state = state_with(model);

        let err = summarize(
            State(state.clone()),
            Ok(Json(json!({ "text": "O governo anunciou hoje." }))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StageError::Upstream(UpstreamError::Model(InferenceError::Timeout))));

        let snapshot = state.stats.snapshot();
        assert_eq!(snapshot.requests, 1);
        assert_eq!(snapshot.failures, 1);
    }
}
