use axum::{Router, http::header, routing::get};
use shinmal::api::{handlers::api_routes, openapi::ApiDoc};
use shinmal::config::CONFIG;
use shinmal::{ConversationController, InMemoryLogging, InMemorySessionStore, InMemoryStorage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.as_str())
        .init();
    info!("Starting with {:?}", *CONFIG);

    let sessions = match CONFIG.session_idle_timeout {
        Some(timeout) => InMemorySessionStore::with_idle_timeout(timeout)?,
        None => InMemorySessionStore::new(),
    };
    let controller = Arc::new(ConversationController::new(
        sessions,
        InMemoryStorage::new(),
        InMemoryLogging::new(),
    ));

    if CONFIG.session_idle_timeout.is_some() {
        let sweeper = Arc::clone(&controller);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CONFIG.session_sweep_interval);
            loop {
                ticker.tick().await;
                match sweeper.expire_idle_sessions().await {
                    Ok(0) => {}
                    Ok(count) => info!("Expired {} idle sessions", count),
                    Err(e) => warn!("Session sweep failed: {}", e),
                }
            }
        });
    }

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(controller))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
