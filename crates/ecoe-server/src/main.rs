use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use eyre::Result;
use tracing::info;

use ecoe_server::{api, config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::load_or_init()?;

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let state = AppState::new(sdk_config, &config);

    // The single tick source: the station countdown advances once per
    // second while a station is in progress.
    let ticker_session = state.session.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            ticker_session.lock().await.tick();
        }
    });

    let router = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, model = %config.model_id, "ecoe server listening");
    axum::serve(listener, router).await?;

    Ok(())
}
