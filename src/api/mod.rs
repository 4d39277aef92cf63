//! HTTP API.
//!
//! | Method | Path              | Success |
//! |--------|-------------------|---------|
//! | GET    | `/`               | 200     |
//! | GET    | `/api/tasks`      | 200     |
//! | POST   | `/api/tasks`      | 201     |
//! | GET    | `/api/tasks/{id}` | 200     |
//! | PUT    | `/api/tasks/{id}` | 200     |
//! | DELETE | `/api/tasks/{id}` | 204     |
//!
//! Unknown ids answer 404 and empty titles 422.

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiErrorResponse};

use crate::tasks::{SqliteTaskStore, TaskService};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Task operations.
    pub tasks: Arc<TaskService<SqliteTaskStore>>,
}

impl AppState {
    /// Wrap a task service.
    pub fn new(tasks: TaskService<SqliteTaskStore>) -> Self {
        Self { tasks: Arc::new(tasks) }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task).put(handlers::update_task).delete(handlers::delete_task),
        )
        .with_state(state)
}

/// CORS layer allowing the given origins with any method and header.
///
/// `*` allows every origin. Origins that are not valid header values are
/// skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(values))
}
