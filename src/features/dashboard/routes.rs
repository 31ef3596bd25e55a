use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Dashboard routes (nested under /api/admin)
pub fn routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .with_state(service)
}
