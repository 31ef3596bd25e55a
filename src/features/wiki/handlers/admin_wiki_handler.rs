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
use crate::features::wiki::dtos::{
    CreateWikiArticleDto, CreateWikiCategoryDto, UpdateWikiArticleDto, UpdateWikiCategoryDto,
    WikiArticleResponseDto, WikiArticleSummaryDto, WikiCategoryResponseDto, WikiCategoryTreeDto,
    WikiReparentRequestDto,
};
use crate::features::wiki::services::{WikiArticleService, WikiCategoryService};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

// ==================== Wiki categories ====================

/// Create a wiki category
#[utoipa::path(
    post,
    path = "/api/admin/wiki/categories",
    request_body = CreateWikiCategoryDto,
    responses(
        (status = 200, description = "Wiki category created", body = ApiResponse<WikiCategoryResponseDto>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Parent wiki category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn create_wiki_category(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiCategoryService>>,
    AppJson(dto): AppJson<CreateWikiCategoryDto>,
) -> Result<Json<ApiResponse<WikiCategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Update a wiki category
#[utoipa::path(
    put,
    path = "/api/admin/wiki/categories/{id}",
    params(("id" = i64, Path, description = "Wiki category id")),
    request_body = UpdateWikiCategoryDto,
    responses(
        (status = 200, description = "Wiki category updated", body = ApiResponse<WikiCategoryResponseDto>),
        (status = 400, description = "Invalid payload or move would create a cycle"),
        (status = 404, description = "Wiki category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn update_wiki_category(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiCategoryService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateWikiCategoryDto>,
) -> Result<Json<ApiResponse<WikiCategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Move wiki categories to new parents (atomic batch)
#[utoipa::path(
    post,
    path = "/api/admin/wiki/categories/reparent",
    request_body = WikiReparentRequestDto,
    responses(
        (status = 200, description = "New wiki category tree", body = ApiResponse<Vec<WikiCategoryTreeDto>>),
        (status = 400, description = "A move would create a cycle"),
        (status = 404, description = "Wiki category or parent not found")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn reparent_wiki_categories(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiCategoryService>>,
    AppJson(dto): AppJson<WikiReparentRequestDto>,
) -> Result<Json<ApiResponse<Vec<WikiCategoryTreeDto>>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tree = service.reparent(dto.updates).await?;
    Ok(Json(ApiResponse::success(Some(tree), None, None)))
}

/// Delete a wiki category
#[utoipa::path(
    delete,
    path = "/api/admin/wiki/categories/{id}",
    params(("id" = i64, Path, description = "Wiki category id")),
    responses(
        (status = 200, description = "Wiki category deleted"),
        (status = 404, description = "Wiki category not found"),
        (status = 409, description = "Wiki category still has articles attached")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn delete_wiki_category(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiCategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Wiki category deleted".to_string()),
        None,
    )))
}

// ==================== Wiki articles ====================

/// Query params for the admin article listing (besides pagination)
#[derive(Debug, Deserialize)]
pub struct AdminListArticlesQuery {
    /// Only articles in this wiki category
    pub category_id: Option<i64>,
}

/// List wiki articles of any status (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/wiki/articles",
    params(
        PaginationQuery,
        ("category_id" = Option<i64>, Query, description = "Filter by wiki category id")
    ),
    responses(
        (status = 200, description = "List of wiki articles", body = ApiResponse<Vec<WikiArticleSummaryDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Editor access required")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn list_all_wiki_articles(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiArticleService>>,
    Query(params): Query<PaginationQuery>,
    Query(query): Query<AdminListArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<WikiArticleSummaryDto>>>> {
    let (items, total) = service
        .list_all(params.offset(), params.limit(), query.category_id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get any wiki article by id
#[utoipa::path(
    get,
    path = "/api/admin/wiki/articles/{id}",
    params(("id" = i64, Path, description = "Wiki article id")),
    responses(
        (status = 200, description = "Wiki article found", body = ApiResponse<WikiArticleResponseDto>),
        (status = 404, description = "Wiki article not found")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn get_wiki_article_by_id(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiArticleService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<WikiArticleResponseDto>>> {
    let article = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(article), None, None)))
}

/// Create a wiki article
#[utoipa::path(
    post,
    path = "/api/admin/wiki/articles",
    request_body = CreateWikiArticleDto,
    responses(
        (status = 200, description = "Wiki article created", body = ApiResponse<WikiArticleResponseDto>),
        (status = 400, description = "Invalid payload or parent in another category"),
        (status = 404, description = "Wiki category or parent article not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn create_wiki_article(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiArticleService>>,
    AppJson(dto): AppJson<CreateWikiArticleDto>,
) -> Result<Json<ApiResponse<WikiArticleResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let article = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(article), None, None)))
}

/// Update a wiki article (including publishing and unpublishing)
#[utoipa::path(
    put,
    path = "/api/admin/wiki/articles/{id}",
    params(("id" = i64, Path, description = "Wiki article id")),
    request_body = UpdateWikiArticleDto,
    responses(
        (status = 200, description = "Wiki article updated", body = ApiResponse<WikiArticleResponseDto>),
        (status = 400, description = "Invalid payload or move would create a cycle"),
        (status = 404, description = "Wiki article not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn update_wiki_article(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiArticleService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateWikiArticleDto>,
) -> Result<Json<ApiResponse<WikiArticleResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let article = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(article), None, None)))
}

/// Move wiki articles to new parents (atomic batch)
#[utoipa::path(
    post,
    path = "/api/admin/wiki/articles/reparent",
    request_body = WikiReparentRequestDto,
    responses(
        (status = 200, description = "Articles reparented"),
        (status = 400, description = "A move would create a cycle or cross categories"),
        (status = 404, description = "Article or parent not found")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn reparent_wiki_articles(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiArticleService>>,
    AppJson(dto): AppJson<WikiReparentRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.reparent(dto.updates).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Articles reparented".to_string()),
        None,
    )))
}

/// Delete a wiki article
#[utoipa::path(
    delete,
    path = "/api/admin/wiki/articles/{id}",
    params(("id" = i64, Path, description = "Wiki article id")),
    responses(
        (status = 200, description = "Wiki article deleted"),
        (status = 404, description = "Wiki article not found")
    ),
    tag = "wiki",
    security(("bearer_auth" = []))
)]
pub async fn delete_wiki_article(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<WikiArticleService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Wiki article deleted".to_string()),
        None,
    )))
}
