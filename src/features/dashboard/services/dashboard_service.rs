use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::{DashboardSummaryDto, RecentPostDto};
use crate::features::posts::models::PostStatus;

/// Service for admin dashboard queries
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Content counts for the dashboard header
    pub async fn get_summary(&self) -> Result<DashboardSummaryDto> {
        let row: (i64, i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM posts),
                (SELECT COUNT(*) FROM posts WHERE status = 'published'),
                (SELECT COUNT(*) FROM posts WHERE status = 'draft'),
                (SELECT COUNT(*) FROM categories),
                (SELECT COUNT(*) FROM wiki_categories),
                (SELECT COUNT(*) FROM wiki_articles),
                (SELECT COUNT(*) FROM wiki_articles WHERE status = 'published'),
                (SELECT COUNT(*) FROM users)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get summary counts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(DashboardSummaryDto {
            total_posts: row.0,
            published_posts: row.1,
            draft_posts: row.2,
            categories: row.3,
            wiki_categories: row.4,
            total_articles: row.5,
            published_articles: row.6,
            users: row.7,
        })
    }

    /// Most recently edited posts
    pub async fn recent_posts(&self, limit: i64) -> Result<Vec<RecentPostDto>> {
        let rows: Vec<(i64, String, String, PostStatus, chrono::DateTime<chrono::Utc>)> =
            sqlx::query_as(
                r#"
                SELECT id, title, slug, status, updated_at
                FROM posts
                ORDER BY updated_at DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list recent posts: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(id, title, slug, status, updated_at)| RecentPostDto {
                id,
                title,
                slug,
                status,
                updated_at,
            })
            .collect())
    }
}
