use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure kinds raised while turning a user signal into a recommendation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecommendationError {
    #[error("Model unavailable: {0} classifier was not loaded")]
    ModelUnavailable(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid join_date: {0}")]
    InvalidDate(String),

    #[error("Aggregation failure: {0}")]
    AggregationFailure(String),

    #[error("Label ordinal {0} is not in the encoder vocabulary")]
    UnseenLabel(i64),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Model artifact error: {0}")]
    Artifact(String),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Recommendation(RecommendationError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Recommendation(err @ RecommendationError::ModelUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            AppError::Recommendation(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Recommendation(RecommendationError::InvalidInput(rejection.body_text()))
    }
}

pub type AppResult<T> = Result<T, AppError>;
