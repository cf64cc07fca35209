//! sourdough-api - REST gateway layer with generic record handlers
//!
//! This crate provides the HTTP layer that uses the StorageBackend trait to
//! serve create/read/update/delete over any named collection. It is
//! backend-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use sourdough_api::{create_router, AppState};
//! use sourdough_core::open_backend;
//!
//! let backend = open_backend(std::env::var("DATABASE_URL").ok().as_deref()).await?;
//! let router = create_router(AppState::new(backend));
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use std::path::Path;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the gateway router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health))
        // Collection routes
        .route(
            "/api/{collection}",
            get(handlers::records::list_records).post(handlers::records::create_record),
        )
        .route(
            "/api/{collection}/{id}",
            get(handlers::records::get_record)
                .put(handlers::records::update_record)
                .delete(handlers::records::delete_record),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve a built static site for every path the router does not handle.
///
/// Unknown paths fall back to `index.html` so client-side routing works.
pub fn with_static_site(router: Router, dir: &Path) -> Router {
    let index = dir.join("index.html");
    tracing::info!(dir = %dir.display(), "Serving static site");
    router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
}
