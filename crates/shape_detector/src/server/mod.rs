use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::DetectorError,
    pipeline::Pipeline,
    types::{Detections, Zone},
};

/// Body of `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeRequest {
    #[schemars(description = "Snapshot URL; TLS certificates are not verified")]
    pub url: String,
    #[schemars(description = "Zones to classify, processed in order")]
    pub zones: Vec<AnalyzeZone>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeZone {
    #[schemars(description = "Rectangle as [x1, y1, x2, y2]")]
    pub coords: [i32; 4],
    pub name: String,
    #[schemars(description = "Bright-pixel count that must be exceeded")]
    pub threshold: i64,
}

impl From<AnalyzeZone> for Zone {
    fn from(zone: AnalyzeZone) -> Self {
        Zone::from_coords(zone.coords, zone.name, zone.threshold)
    }
}

/// Body of a successful `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub detections: Detections,
    /// `data:image/jpeg;base64,...` of the masked image
    pub image: String,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(#[from] serde_json::Error),
    #[error(transparent)]
    Analysis(#[from] DetectorError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, self.to_string()).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

/// Routes: `POST /analyze`, `GET /schema`, `GET /health`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/schema", get(schema))
        .route("/health", get(health))
        .with_state(state)
}

async fn analyze(State(state): State<AppState>, body: Bytes) -> Result<Json<AnalyzeResponse>, ServerError> {
    let request: AnalyzeRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Request error: {}", e);
        e
    })?;
    tracing::info!(url = %request.url, zones = request.zones.len(), "Request decoded");

    let zones = request.zones.into_iter().map(Zone::from).collect();
    let analysis = state.pipeline.analyze(request.url, zones).await.map_err(|e| {
        tracing::error!("Analysis failed: {}", e);
        e
    })?;

    let response = AnalyzeResponse {
        detections: analysis.detections,
        image: analysis.preview.unwrap_or_default(),
    };
    tracing::info!(detections = ?response.detections, "Response sent");
    Ok(Json(response))
}

async fn schema() -> Json<schemars::schema::RootSchema> {
    Json(schemars::schema_for!(AnalyzeRequest))
}

async fn health() -> &'static str {
    "ok"
}
