use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::error::Result;
use crate::features::posts::dtos::{PostResponseDto, PostSummaryDto};
use crate::features::posts::services::PostService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Query params for the public post listing (besides pagination)
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// Only posts in the category with this slug
    pub category: Option<String>,
}

/// List published posts (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        PaginationQuery,
        ("category" = Option<String>, Query, description = "Filter by category slug")
    ),
    responses(
        (status = 200, description = "List of published posts", body = ApiResponse<Vec<PostSummaryDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "posts"
)]
pub async fn list_posts(
    State(service): State<Arc<PostService>>,
    Query(params): Query<PaginationQuery>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<ApiResponse<Vec<PostSummaryDto>>>> {
    let (items, total) = service
        .list_published(params.offset(), params.limit(), query.category.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a published post by slug
#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post found", body = ApiResponse<PostResponseDto>),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(service): State<Arc<PostService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    let post = service.get_published_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(post), None, None)))
}
