use userdesk_server::config::ServerConfig;
use userdesk_server::{routes, state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    if config.token_ttl.as_secs() > 60 * 60 * 24 * 30 {
        tracing::warn!(ttl_secs = config.token_ttl.as_secs(), "mock tokens are long-lived");
    }

    let state = state::AppState::from_config(&config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    tracing::info!(port = config.port, "userdesk server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
