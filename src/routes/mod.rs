use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::{request_id_middleware, request_span},
    services::RecommendationResolver,
};

pub mod fitness;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RecommendationResolver>,
}

impl AppState {
    pub fn new(resolver: RecommendationResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/fitness", fitness_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(request_span)),
        )
}

/// Recommendation routes under /api/fitness
fn fitness_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(fitness::health))
        .route("/recommend", post(fitness::recommend))
        .route("/predict-category", post(fitness::predict_category))
        .route("/predict-goal", post(fitness::predict_goal))
}

/// CORS policy: a single configured origin, or anything when unset
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origin = config
        .frontend_origin
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok());

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
