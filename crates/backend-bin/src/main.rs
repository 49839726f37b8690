use forum_backend_lib::{config::Settings, router, storage::FlatFileStorage, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let storage = FlatFileStorage::new(&settings.data_dir)?;

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings));
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "forum server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
