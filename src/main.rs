#![recursion_limit = "256"]

mod config;
mod identity;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let identity = identity::CognitoClient::new(&config.cognito, config.timeouts).expect("identity client init failed");
    let fab_api =
        services::fab_api::FabApiClient::new(&config.api_url, config.timeouts).expect("fab API client init failed");
    tracing::info!(
        api_url = %config.api_url,
        user_pool = %config.cognito.user_pool_id,
        bucket = %config.client.bucket,
        "upstream clients initialized"
    );

    let port = config.port;
    let state = state::AppState::new(config, Arc::new(identity), Arc::new(fab_api));
    let _sweeper = services::session::spawn_session_sweeper(state.sessions.clone());

    let app = routes::app(state).expect("router init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "wafer-review listening");
    axum::serve(listener, app).await.expect("server failed");
}
