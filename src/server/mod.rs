pub mod handlers;
pub mod routes;

use crate::{
    Result,
    config::{Config, ServerConfig},
    llm::InferenceClient,
};
use axum::Router;
use handlers::AppState;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Assembles the full application router around `state`.
pub fn build_app(state: AppState) -> Router {
    routes::register_routes(Router::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize the inference client
    let client = InferenceClient::new(&config.inference)?;
    info!(
        "Forwarding completions to {} using model {}",
        client.endpoint(),
        config.inference.model_or_default()
    );

    let app_state = AppState::new(config.inference.clone(), client);
    let app = build_app(app_state);

    // Start server
    let listener = bind_listener(&config.server).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Binds `SERVER_HOST:SERVER_PORT`; the host may be an IP literal or a name
/// such as `localhost`.
pub async fn bind_listener(server: &ServerConfig) -> Result<TcpListener> {
    let port = server.listen_port()?;
    let listener = TcpListener::bind((server.host.as_str(), port)).await?;
    Ok(listener)
}
