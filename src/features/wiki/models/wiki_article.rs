use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::shared::hierarchy::TreeItem;

/// Publication state of a wiki article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "article_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

/// Database model for a wiki article.
///
/// Articles are content items and hierarchy nodes at the same time: they
/// belong to a wiki category and additionally form their own tree inside
/// that category via `parent_id`.
#[derive(Debug, Clone, FromRow)]
pub struct WikiArticle {
    pub id: i64,
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
    pub status: ArticleStatus,
    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TreeItem for WikiArticle {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn display_order(&self) -> i32 {
        self.display_order
    }
    fn sort_name(&self) -> &str {
        &self.title
    }
}
