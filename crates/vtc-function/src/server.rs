//! HTTP trigger surface.
//!
//! The platform delivers the storage notification as an HTTP POST, either
//! wrapped in a CloudEvent envelope or as the bare object payload. The
//! handler responds only after the submitted job reached a terminal state,
//! so nothing outlives the invocation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use vtc_models::{JobState, StorageEvent};
use vtc_transcoder::{TranscoderClient, TranscoderConfig};

use crate::config::FunctionConfig;
use crate::error::{FunctionError, FunctionResult};
use crate::handler::process_event;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FunctionConfig>,
    pub transcoder: Arc<TranscoderClient>,
}

impl AppState {
    /// Build the state from a loaded configuration.
    pub fn new(config: FunctionConfig) -> FunctionResult<Self> {
        let transcoder = TranscoderClient::new(TranscoderConfig::new(
            config.project_id.clone(),
            config.location.clone(),
        ))?;

        Ok(Self {
            config: Arc::new(config),
            transcoder: Arc::new(transcoder),
        })
    }
}

/// Inbound notification, with or without a CloudEvent envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventEnvelope {
    CloudEvent { data: StorageEvent },
    Bare(StorageEvent),
}

impl EventEnvelope {
    fn into_event(self) -> StorageEvent {
        match self {
            EventEnvelope::CloudEvent { data } => data,
            EventEnvelope::Bare(event) => event,
        }
    }
}

/// Response for a completed invocation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub job_id: String,
    pub state: JobState,
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Handle one storage notification end to end.
async fn handle_event(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<InvocationResponse>, FunctionError> {
    let event = serde_json::from_value::<EventEnvelope>(body)
        .map_err(|e| FunctionError::MalformedEvent(e.to_string()))?
        .into_event();

    let job = process_event(&state.transcoder, &state.config, &event).await?;

    Ok(Json(InvocationResponse {
        job_id: job.id().to_string(),
        state: job.state,
    }))
}

/// Create the trigger router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_event))
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
