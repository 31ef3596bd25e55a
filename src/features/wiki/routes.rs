use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::wiki::handlers;
use crate::features::wiki::services::{WikiArticleService, WikiCategoryService};

/// Public read routes for the wiki
pub fn routes(
    category_service: Arc<WikiCategoryService>,
    article_service: Arc<WikiArticleService>,
) -> Router {
    let categories = Router::new()
        .route("/api/wiki/categories", get(handlers::list_wiki_categories))
        .route(
            "/api/wiki/categories/{slug}",
            get(handlers::get_wiki_category),
        )
        .with_state(category_service);

    let articles = Router::new()
        .route(
            "/api/wiki/categories/{slug}/articles",
            get(handlers::list_wiki_category_articles),
        )
        .route("/api/wiki/articles/{slug}", get(handlers::get_wiki_article))
        .with_state(article_service);

    categories.merge(articles)
}

/// Editor routes (nested under /api/admin)
pub fn admin_routes(
    category_service: Arc<WikiCategoryService>,
    article_service: Arc<WikiArticleService>,
) -> Router {
    let categories = Router::new()
        .route("/wiki/categories", post(handlers::create_wiki_category))
        .route(
            "/wiki/categories/reparent",
            post(handlers::reparent_wiki_categories),
        )
        .route(
            "/wiki/categories/{id}",
            put(handlers::update_wiki_category).delete(handlers::delete_wiki_category),
        )
        .with_state(category_service);

    let articles = Router::new()
        .route(
            "/wiki/articles",
            get(handlers::list_all_wiki_articles).post(handlers::create_wiki_article),
        )
        .route(
            "/wiki/articles/reparent",
            post(handlers::reparent_wiki_articles),
        )
        .route(
            "/wiki/articles/{id}",
            get(handlers::get_wiki_article_by_id)
                .put(handlers::update_wiki_article)
                .delete(handlers::delete_wiki_article),
        )
        .with_state(article_service);

    categories.merge(articles)
}
