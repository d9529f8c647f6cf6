use station_cloud::db::BoxError;
use station_cloud::{AppState, Config, api};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "station_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting station-cloud (env: {})", config.environment);
    if config.chapa_webhook_secret.is_none() {
        tracing::warn!("CHAPA_WEBHOOK_SECRET not set, POST callbacks are not signature-checked");
    }

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("station-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
