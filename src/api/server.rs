//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::api::session::SessionManager;
use crate::config::AppConfig;
use crate::rag::RagService;
use crate::Result;

/// Full application router with middleware
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server.
///
/// Fails before binding when the collection has not been indexed.
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting reviewrag API server...");

    let rag = Arc::new(RagService::new(config).await?);
    let sessions = Arc::new(SessionManager::new(config.server.session_timeout_secs));
    let app = build_app(AppState { rag, sessions }, enable_cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health        - Health check");
    info!("  POST /api/chat          - Ask a question (new or existing session)");
    info!("  GET  /api/sessions/:id  - Session history");

    axum::serve(listener, app).await?;

    Ok(())
}
