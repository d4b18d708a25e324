//! pjv-dash library - Interactive dashboard over the consolidated table
//!
//! Serves the filter/browse UI and the absence report from the two
//! artifacts written by pjv-report (CSV table + JSON registry). All data
//! routes are read-only and require an authenticated session.

use std::sync::{Arc, Mutex};

use axum::Router;
use pjv_common::config::Config;

pub mod api;
pub mod cache;
pub mod session;

use cache::TableCache;
use session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Memoized table/registry loader, keyed by file mtime
    pub cache: Arc<Mutex<TableCache>>,
    /// Login sessions (opaque token -> authenticated flag)
    pub sessions: SessionStore,
}

impl AppState {
    /// Create new application state from resolved configuration
    pub fn new(config: Config) -> Self {
        let cache = TableCache::new(config.table_path.clone(), config.registry_path.clone());
        Self {
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(cache)),
            sessions: SessionStore::default(),
        }
    }
}

/// Build application router
///
/// Data routes require a session; the UI shell, login/logout, and the
/// health endpoint are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    // Protected routes (require an authenticated session)
    let protected = Router::new()
        .route("/api/options", get(api::get_options))
        .route("/api/view", get(api::get_view))
        .route("/api/export", get(api::export_csv))
        .route("/api/absence", get(api::get_absence))
        .route("/api/reload", post(api::reload))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
