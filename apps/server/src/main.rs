use quotedesk_server::api::app_router;
use quotedesk_server::config::Config;
use quotedesk_server::main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    let router = app_router(state);
    tracing::info!("Listening on {}", config.listen_addr());
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
