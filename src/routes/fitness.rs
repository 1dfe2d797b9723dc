use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CategoryPrediction, Feature, GoalPrediction, Resolution, UserSignal},
    routes::AppState,
};

/// Fields the recommend endpoint insists on
const REQUIRED_FIELDS: [Feature; 3] = [Feature::Age, Feature::Bmi, Feature::FitnessLevelNum];

/// Handler for the full recommendation pipeline
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<UserSignal>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Resolution>)> {
    let Json(signal) = payload?;

    // A null counts as missing
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| signal.get(**f).is_none()) {
        return Err(AppError::InvalidInput(format!(
            "Missing required field: {}",
            missing
        )));
    }

    tracing::info!(request_id = %request_id, "Processing recommendation request");

    let resolution = state.resolver.resolve(signal);
    let status = if resolution.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::info!(
        request_id = %request_id,
        success = resolution.is_success(),
        "Recommendation completed"
    );

    Ok((status, Json(resolution)))
}

/// Handler for category-only prediction
pub async fn predict_category(
    State(state): State<AppState>,
    payload: Result<Json<UserSignal>, JsonRejection>,
) -> AppResult<Json<CategoryPrediction>> {
    let Json(signal) = payload?;
    let prediction = state.resolver.predict_category(&signal)?;
    Ok(Json(prediction))
}

/// Handler for goal-only prediction
pub async fn predict_goal(
    State(state): State<AppState>,
    payload: Result<Json<UserSignal>, JsonRejection>,
) -> AppResult<Json<GoalPrediction>> {
    let Json(signal) = payload?;
    let prediction = state.resolver.predict_goal(&signal)?;
    Ok(Json(prediction))
}

/// Reports whether both classifiers are available
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "models_loaded": state.resolver.models_loaded(),
        "service_version": "1.0"
    }))
}
