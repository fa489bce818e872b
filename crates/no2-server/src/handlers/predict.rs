//! Prediction HTTP handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{error, info, warn};

use crate::dto::{PredictRequest, PredictResponse};
use crate::error::AppError;
use crate::services::prediction as prediction_service;
use crate::ServerState;

pub const MISSING_COORDINATES: &str = "Missing latitude or longitude";

/// POST /predict - Predicts the NO₂ level for a coordinate pair.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected prediction body: {}", rejection.body_text());
        AppError::from(rejection)
    })?;

    let coords = req
        .coordinates()
        .ok_or_else(|| AppError::BadRequest(MISSING_COORDINATES.into()))?;
    info!("Received {}", coords);

    let prediction = prediction_service::predict(state.model(), coords).map_err(|e| {
        error!("Prediction failed for {}: {}", coords, e);
        AppError::Internal("prediction failed".into())
    })?;

    Ok(Json(PredictResponse { no2_prediction: prediction }))
}
