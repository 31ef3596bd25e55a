use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::wiki::models::{ArticleStatus, WikiArticle};
use crate::shared::hierarchy::Tree;

/// Wiki article as returned by single-item endpoints (includes the body)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WikiArticleResponseDto {
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
    pub updated_at: DateTime<Utc>,
}

impl From<WikiArticle> for WikiArticleResponseDto {
    fn from(a: WikiArticle) -> Self {
        Self {
            id: a.id,
            category_id: a.category_id,
            parent_id: a.parent_id,
            title: a.title,
            slug: a.slug,
            summary: a.summary,
            body: a.body,
            status: a.status,
            display_order: a.display_order,
            published_at: a.published_at,
            updated_at: a.updated_at,
        }
    }
}

/// Wiki article as returned by list endpoints (no body)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WikiArticleSummaryDto {
    pub id: i64,
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub status: ArticleStatus,
    pub display_order: i32,
}

impl From<WikiArticle> for WikiArticleSummaryDto {
    fn from(a: WikiArticle) -> Self {
        Self {
            id: a.id,
            category_id: a.category_id,
            parent_id: a.parent_id,
            title: a.title,
            slug: a.slug,
            summary: a.summary,
            status: a.status,
            display_order: a.display_order,
        }
    }
}

/// Article tree inside a wiki category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct WikiArticleTreeDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub status: ArticleStatus,
    pub display_order: i32,
    pub children: Vec<WikiArticleTreeDto>,
}

impl WikiArticleTreeDto {
    pub fn from_tree(tree: Tree<WikiArticle>) -> Self {
        let Tree { item, children } = tree;
        Self {
            id: item.id,
            parent_id: item.parent_id,
            title: item.title,
            slug: item.slug,
            summary: item.summary,
            status: item.status,
            display_order: item.display_order,
            children: children.into_iter().map(Self::from_tree).collect(),
        }
    }
}

/// Payload for creating a wiki article
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWikiArticleDto {
    #[validate(length(min = 1, max = 240, message = "title must be 1-240 characters"))]
    pub title: String,

    /// Derived from the title when omitted
    pub slug: Option<String>,

    pub summary: Option<String>,

    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: String,

    /// Owning wiki category
    pub category_id: Option<i64>,

    /// Parent article inside the same category
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub display_order: i32,

    /// Defaults to draft
    pub status: Option<ArticleStatus>,
}

/// Payload for updating a wiki article. Omitted fields keep their value;
/// `category_id` and `parent_id` distinguish "absent" (keep) from `null`
/// (detach).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWikiArticleDto {
    #[validate(length(min = 1, max = 240, message = "title must be 1-240 characters"))]
    pub title: Option<String>,

    pub slug: Option<String>,

    pub summary: Option<String>,

    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: Option<String>,

    #[serde(default, deserialize_with = "crate::shared::types::double_option")]
    #[schema(value_type = Option<i64>)]
    pub category_id: Option<Option<i64>>,

    #[serde(default, deserialize_with = "crate::shared::types::double_option")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,

    pub display_order: Option<i32>,

    pub status: Option<ArticleStatus>,
}
