use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::posts::models::PostStatus;

/// Content statistics for the admin dashboard header
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub categories: i64,
    pub wiki_categories: i64,
    pub total_articles: i64,
    pub published_articles: i64,
    pub users: i64,
}

/// Recently edited post, shown on the dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecentPostDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
    pub updated_at: DateTime<Utc>,
}
