//! Axum server setup: routing, CORS, and startup.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Settings;

use super::handlers::{self, new_shared_workbench, SharedWorkbench};

/// Build the axum router with all routes.
pub fn router(state: SharedWorkbench) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/database", post(handlers::load_database))
        .route("/api/database", get(handlers::database_status))
        .route("/api/database", delete(handlers::unload_database))
        .route("/api/schema", get(handlers::get_schema))
        .route("/api/translate", post(handlers::translate))
        .route("/api/execute", post(handlers::execute))
        .route("/api/score", post(handlers::score))
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/predicted.sql", get(handlers::predicted_sql))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn serve(settings: Settings, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = new_shared_workbench(&settings);
    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("nlsql workbench");
    println!("   URL: http://localhost:{}", port);
    println!("   Translation endpoint: {}", settings.endpoints.translation_url);
    println!();
    println!("   Press Ctrl+C to stop");

    axum::serve(listener, app).await?;
    Ok(())
}
