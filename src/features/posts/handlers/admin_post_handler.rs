use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireEditor;
use crate::features::posts::dtos::{
    CreatePostDto, PostResponseDto, PostSummaryDto, UpdatePostDto,
};
use crate::features::posts::models::PostStatus;
use crate::features::posts::services::PostService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Query params for the admin post listing (besides pagination)
#[derive(Debug, Deserialize)]
pub struct AdminListPostsQuery {
    /// Only posts with this status
    pub status: Option<PostStatus>,
}

/// List posts of any status (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/posts",
    params(
        PaginationQuery,
        ("status" = Option<String>, Query, description = "Filter by status (draft, published)")
    ),
    responses(
        (status = 200, description = "List of posts", body = ApiResponse<Vec<PostSummaryDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Editor access required")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn list_all_posts(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<PostService>>,
    Query(params): Query<PaginationQuery>,
    Query(query): Query<AdminListPostsQuery>,
) -> Result<Json<ApiResponse<Vec<PostSummaryDto>>>> {
    let (items, total) = service
        .list_all(params.offset(), params.limit(), query.status)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get any post by id
#[utoipa::path(
    get,
    path = "/api/admin/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = ApiResponse<PostResponseDto>),
        (status = 404, description = "Post not found")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn get_post_by_id(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    let post = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(post), None, None)))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/admin/posts",
    request_body = CreatePostDto,
    responses(
        (status = 200, description = "Post created", body = ApiResponse<PostResponseDto>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    RequireEditor(user): RequireEditor,
    State(service): State<Arc<PostService>>,
    AppJson(dto): AppJson<CreatePostDto>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let post = service.create(dto, user.id).await?;
    Ok(Json(ApiResponse::success(Some(post), None, None)))
}

/// Update a post (including publishing and unpublishing)
#[utoipa::path(
    put,
    path = "/api/admin/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostResponseDto>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let post = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(post), None, None)))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Post deleted".to_string()),
        None,
    )))
}
