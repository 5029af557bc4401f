//! Classifier stage.
//!
//! `POST /classify` validates `text`, asks the model to pick one of the two
//! candidate labels, resolves a [`Verdict`](factline_types::Verdict), then
//! calls the Summarizer with the text and the verdict flag.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, info};

use factline_core::{build_classification_prompt, excerpt, required_text, resolve_verdict};
use factline_llm::{InferenceProvider, OllamaClient};
use factline_types::{Config, LabelSet, PipelineResult, ResultMetadata, SummaryRequest};

use super::monitoring::{StageStats, monitoring_routes};
use super::with_common_layers;
use crate::error::{StageError, UpstreamError};
use crate::stage_client::StageClient;

/// Service name reported by `/health` and `/stats`.
pub const SERVICE_NAME: &str = "fake-news-classifier";

#[derive(Clone)]
pub struct ClassifierState {
    pub model: Arc<dyn InferenceProvider>,
    pub summarizer: StageClient,
    pub labels: Arc<LabelSet>,
    pub stats: Arc<StageStats>,
}

impl FromRef<ClassifierState> for Arc<StageStats> {
    fn from_ref(state: &ClassifierState) -> Self {
        state.stats.clone()
    }
}

impl ClassifierState {
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let classifier = &config.classifier;
        let model = OllamaClient::new(classifier.model.clone(), config.timeout())?;
        Ok(Self {
            model: Arc::new(model),
            summarizer: StageClient::new(
                &classifier.summarizer_url,
                config.summarizer_hop_timeout(),
            )?,
            labels: Arc::new(classifier.labels.clone()),
            stats: Arc::new(StageStats::new(SERVICE_NAME)),
        })
    }
}

pub fn router(state: ClassifierState, body_limit_bytes: usize) -> Router {
    let routes = Router::new()
        .route("/classify", post(classify))
        .merge(monitoring_routes::<ClassifierState>())
        .with_state(state);
    with_common_layers(routes, body_limit_bytes)
}

async fn classify(
    State(state): State<ClassifierState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PipelineResult>, StageError> {
    state.stats.record_request();
    let result = run_classification(&state, payload).await;
    if result.is_err() {
        state.stats.record_failure();
    }
    result.map(Json)
}

async fn run_classification(
    state: &ClassifierState,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<PipelineResult, StageError> {
    let Json(body) = payload?;
    let text = required_text(&body, "text")?;
    let started = Instant::now();

    info!(text_len = text.chars().count(), "classifying text");

    let prompt = build_classification_prompt(text, &state.labels.candidates());
    let model_id = state.model.default_model().to_string();
    let output = state.model.infer(&prompt, &model_id).await?;
    debug!(output = %output, "classifier model output");

    let verdict = resolve_verdict(&output, &state.labels);
    let is_fake_news = state.labels.is_fake(&verdict);
    info!(
        is_fake_news,
        unresolved = verdict.is_unresolved(),
        "classification complete"
    );

    let summary = state
        .summarizer
        .summarize(&SummaryRequest {
            text: text.to_string(),
            is_fake_news,
        })
        .await?;

    Ok(PipelineResult {
        text: excerpt(text),
        is_fake_news,
        verdict,
        summary: summary.summary,
        metadata: ResultMetadata::now(model_id, started.elapsed().as_millis() as u64),
    })
}
