use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::posts::models::{Post, PostStatus};

/// Post as returned by single-item endpoints (includes the body)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponseDto {
    pub id: i64,
    pub category_id: Option<i64>,
    pub author_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponseDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            category_id: p.category_id,
            author_id: p.author_id,
            title: p.title,
            slug: p.slug,
            excerpt: p.excerpt,
            body: p.body,
            status: p.status,
            published_at: p.published_at,
            updated_at: p.updated_at,
        }
    }
}

/// Post as returned by list endpoints (no body)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostSummaryDto {
    pub id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostSummaryDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            category_id: p.category_id,
            title: p.title,
            slug: p.slug,
            excerpt: p.excerpt,
            status: p.status,
            published_at: p.published_at,
        }
    }
}

/// Payload for creating a post
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 240, message = "title must be 1-240 characters"))]
    pub title: String,

    /// Derived from the title when omitted
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: String,

    pub category_id: Option<i64>,

    /// Defaults to draft
    pub status: Option<PostStatus>,
}

/// Payload for updating a post. Omitted fields keep their value;
/// `category_id` distinguishes "absent" (keep) from `null` (detach).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, max = 240, message = "title must be 1-240 characters"))]
    pub title: Option<String>,

    pub slug: Option<String>,

    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: Option<String>,

    #[serde(default, deserialize_with = "crate::shared::types::double_option")]
    #[schema(value_type = Option<i64>)]
    pub category_id: Option<Option<i64>>,

    pub status: Option<PostStatus>,
}
