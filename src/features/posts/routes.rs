use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::posts::handlers;
use crate::features::posts::services::PostService;

/// Public read routes for published posts
pub fn routes(service: Arc<PostService>) -> Router {
    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts/{slug}", get(handlers::get_post))
        .with_state(service)
}

/// Editor routes (nested under /api/admin)
pub fn admin_routes(service: Arc<PostService>) -> Router {
    Router::new()
        .route(
            "/posts",
            get(handlers::list_all_posts).post(handlers::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::get_post_by_id)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .with_state(service)
}
