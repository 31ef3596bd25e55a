use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::features::auth::guards::RequireEditor;
use crate::features::dashboard::dtos::{DashboardSummaryDto, RecentPostDto};
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

const RECENT_POSTS: i64 = 5;

/// Dashboard payload combining stats and recent activity
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDto {
    pub summary: DashboardSummaryDto,
    pub recent_posts: Vec<RecentPostDto>,
}

/// Admin dashboard: content statistics and recent activity
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = ApiResponse<DashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Editor access required")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(
    RequireEditor(_user): RequireEditor,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let summary = service.get_summary().await?;
    let recent_posts = service.recent_posts(RECENT_POSTS).await?;

    Ok(Json(ApiResponse::success(
        Some(DashboardDto {
            summary,
            recent_posts,
        }),
        None,
        None,
    )))
}
