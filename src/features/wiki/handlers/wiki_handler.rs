use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::error::Result;
use crate::features::wiki::dtos::{
    WikiArticleResponseDto, WikiArticleTreeDto, WikiCategoryResponseDto,
};
use crate::features::wiki::services::{WikiArticleService, WikiCategoryService};
use crate::shared::types::ApiResponse;

/// Query params for listing wiki categories
#[derive(Debug, Deserialize)]
pub struct ListWikiCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// List all wiki categories
#[utoipa::path(
    get,
    path = "/api/wiki/categories",
    params(
        ("tree" = Option<bool>, Query, description = "Return tree structure if true")
    ),
    responses(
        (status = 200, description = "List of wiki categories", body = ApiResponse<Vec<WikiCategoryResponseDto>>),
    ),
    tag = "wiki"
)]
pub async fn list_wiki_categories(
    State(service): State<Arc<WikiCategoryService>>,
    Query(query): Query<ListWikiCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    if query.tree {
        let tree = service.list_tree().await?;
        let value = serde_json::to_value(tree).unwrap();
        Ok(Json(ApiResponse::success(Some(value), None, None)))
    } else {
        let categories = service.list().await?;
        let value = serde_json::to_value(categories).unwrap();
        Ok(Json(ApiResponse::success(Some(value), None, None)))
    }
}

/// Get wiki category by slug
#[utoipa::path(
    get,
    path = "/api/wiki/categories/{slug}",
    params(("slug" = String, Path, description = "Wiki category slug")),
    responses(
        (status = 200, description = "Wiki category found", body = ApiResponse<WikiCategoryResponseDto>),
        (status = 404, description = "Wiki category not found")
    ),
    tag = "wiki"
)]
pub async fn get_wiki_category(
    State(service): State<Arc<WikiCategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<WikiCategoryResponseDto>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Published article tree of a wiki category
#[utoipa::path(
    get,
    path = "/api/wiki/categories/{slug}/articles",
    params(("slug" = String, Path, description = "Wiki category slug")),
    responses(
        (status = 200, description = "Article tree", body = ApiResponse<Vec<WikiArticleTreeDto>>),
        (status = 404, description = "Wiki category not found")
    ),
    tag = "wiki"
)]
pub async fn list_wiki_category_articles(
    State(service): State<Arc<WikiArticleService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<WikiArticleTreeDto>>>> {
    let tree = service.list_tree_by_category(&slug, true).await?;
    Ok(Json(ApiResponse::success(Some(tree), None, None)))
}

/// Get a published wiki article by slug
#[utoipa::path(
    get,
    path = "/api/wiki/articles/{slug}",
    params(("slug" = String, Path, description = "Wiki article slug")),
    responses(
        (status = 200, description = "Wiki article found", body = ApiResponse<WikiArticleResponseDto>),
        (status = 404, description = "Wiki article not found")
    ),
    tag = "wiki"
)]
pub async fn get_wiki_article(
    State(service): State<Arc<WikiArticleService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<WikiArticleResponseDto>>> {
    let article = service.get_published_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(article), None, None)))
}
