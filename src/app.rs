use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::ResponseWriter;
use crate::config::AppConfig;
use crate::database::ModuleStore;
use crate::handlers;

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ModuleStore>,
    pub writer: Arc<ResponseWriter>,
}

impl AppState {
    pub fn new(store: Arc<dyn ModuleStore>, config: &AppConfig) -> Self {
        Self {
            store,
            writer: Arc::new(ResponseWriter::new(&config.response)),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let base_path = config.server.base_path.as_str();
    let router = Router::new()
        // Public
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health));

    let router = if base_path.is_empty() {
        router.merge(module_routes())
    } else {
        router.nest(base_path, module_routes())
    };

    let router = router.layer(TraceLayer::new_for_http());
    let router = if config.server.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.with_state(state)
}

fn module_routes() -> Router<AppState> {
    use handlers::module;

    Router::new()
        // Lazy tree loading and grid listing
        .route("/get-children", get(module::get_children))
        .route("/get-module", get(module::get_module))
        .route("/get/:id", get(module::get_by_id))
        // Mutations
        .route("/add", post(module::add))
        .route("/update", post(module::update))
        .route("/delete", post(module::delete))
}
