mod api;
mod config;
mod db;
mod errors;
mod system;
mod videos;

use anyhow::Context;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::api::create_api_router;
use crate::config::Settings;
use crate::db::init_db;
use crate::videos::store::VideoStore;

#[derive(Clone)]
pub struct InnerState {
    pub videos: VideoStore,
    pub app_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_collection=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let db = init_db(&settings).await?;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let videos = VideoStore::new(db);
    tracing::info!("Catalog holds {} videos", videos.count().await?);

    let app_state = InnerState {
        videos,
        app_name: settings.app_name.clone(),
    };

    let app = create_api_router(app_state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("Could not bind {}", settings.bind_address))?;

    tracing::info!(
        "{} listening on {}",
        settings.app_name,
        listener
            .local_addr()
            .context("Could not read listener address")?
    );

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
