use fitconnect_recommender::{
    config::Config,
    models::ReferenceCohort,
    routes::{cors_layer, create_router, AppState},
    services::{ModelSet, RecommendationResolver},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitconnect_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Degraded start: missing models surface per request, not here
    let models = ModelSet::load(&config);
    if !models.all_loaded() {
        tracing::warn!("Starting without all classifiers; affected endpoints will fail");
    }

    let cohort = match &config.cohort_path {
        Some(path) => ReferenceCohort::load(path)?,
        None => ReferenceCohort::seed(),
    };
    tracing::info!(rows = cohort.rows().len(), "Reference cohort ready");

    let state = AppState::new(RecommendationResolver::new(models, cohort));
    let app = create_router(state).layer(cors_layer(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
