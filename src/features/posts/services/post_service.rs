use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::posts::dtos::{
    CreatePostDto, PostResponseDto, PostSummaryDto, UpdatePostDto,
};
use crate::features::posts::models::{Post, PostStatus};
use crate::shared::slug::slugify;
use crate::shared::validation::SLUG_REGEX;

const SELECT_COLUMNS: &str = "id, category_id, author_id, title, slug, excerpt, body, \
                              status, published_at, created_at, updated_at";

/// Service for blog post operations
pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List published posts, newest first, optionally filtered by category slug.
    ///
    /// Returns (posts, total_count).
    pub async fn list_published(
        &self,
        offset: i64,
        limit: i64,
        category_slug: Option<&str>,
    ) -> Result<(Vec<PostSummaryDto>, i64)> {
        let category_id = match category_slug {
            Some(slug) => {
                let id: Option<i64> =
                    sqlx::query_scalar("SELECT id FROM categories WHERE slug = $1")
                        .bind(slug)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to resolve category slug: {:?}", e);
                            AppError::Database(e)
                        })?;
                Some(id.ok_or_else(|| {
                    AppError::NotFound(format!("Category '{}' not found", slug))
                })?)
            }
            None => None,
        };

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM posts
            WHERE status = 'published' AND ($1::BIGINT IS NULL OR category_id = $1)
            "#,
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count published posts: {:?}", e);
            AppError::Database(e)
        })?;

        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM posts
            WHERE status = 'published' AND ($1::BIGINT IS NULL OR category_id = $1)
            ORDER BY published_at DESC NULLS LAST
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(category_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list published posts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((posts.into_iter().map(|p| p.into()).collect(), total))
    }

    /// Get a published post by slug
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<PostResponseDto> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE slug = $1 AND status = 'published'"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get post by slug: {:?}", e);
            AppError::Database(e)
        })?;

        post.map(|p| p.into())
            .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", slug)))
    }

    /// List posts for the admin dashboard, any status, newest first
    pub async fn list_all(
        &self,
        offset: i64,
        limit: i64,
        status: Option<PostStatus>,
    ) -> Result<(Vec<PostSummaryDto>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE ($1::post_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count posts: {:?}", e);
            AppError::Database(e)
        })?;

        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM posts
            WHERE ($1::post_status IS NULL OR status = $1)
            ORDER BY updated_at DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list posts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((posts.into_iter().map(|p| p.into()).collect(), total))
    }

    /// Get any post by id (admin)
    pub async fn get_by_id(&self, id: i64) -> Result<PostResponseDto> {
        let post = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;
        Ok(post.into())
    }

    /// Create a post; the slug is derived from the title when omitted
    pub async fn create(&self, dto: CreatePostDto, author_id: Uuid) -> Result<PostResponseDto> {
        let slug = self
            .resolve_slug(&dto.title, dto.slug.as_deref(), None)
            .await?;

        if let Some(category_id) = dto.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let status = dto.status.unwrap_or(PostStatus::Draft);

        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (category_id, author_id, title, slug, excerpt, body, status, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7,
                    CASE WHEN $7 = 'published'::post_status THEN NOW() ELSE NULL END)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(dto.category_id)
        .bind(author_id)
        .bind(&dto.title)
        .bind(&slug)
        .bind(&dto.excerpt)
        .bind(&dto.body)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert post: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Post created: id={}, slug={}", post.id, post.slug);

        Ok(post.into())
    }

    /// Update a post. Publishing for the first time stamps `published_at`.
    pub async fn update(&self, id: i64, dto: UpdatePostDto) -> Result<PostResponseDto> {
        let existing = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

        let title = dto.title.unwrap_or(existing.title);
        let slug = match dto.slug {
            Some(requested) => self.resolve_slug(&title, Some(&requested), Some(id)).await?,
            None => existing.slug,
        };
        let excerpt = dto.excerpt.or(existing.excerpt);
        let body = dto.body.unwrap_or(existing.body);
        let status = dto.status.unwrap_or(existing.status);

        let category_id = match dto.category_id {
            Some(new_category) => {
                if let Some(category_id) = new_category {
                    self.ensure_category_exists(category_id).await?;
                }
                new_category
            }
            None => existing.category_id,
        };

        let published_at = match (status, existing.published_at) {
            (PostStatus::Published, None) => Some(chrono::Utc::now()),
            (_, existing_published_at) => existing_published_at,
        };

        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET category_id = $1, title = $2, slug = $3, excerpt = $4, body = $5,
                status = $6, published_at = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(category_id)
        .bind(&title)
        .bind(&slug)
        .bind(&excerpt)
        .bind(&body)
        .bind(status)
        .bind(published_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update post {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(post.into())
    }

    /// Delete a post
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete post {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        tracing::info!("Post deleted: id={}", id);

        Ok(())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch post {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn ensure_category_exists(&self, category_id: i64) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check category {}: {:?}", category_id, e);
                AppError::Database(e)
            })?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }
        Ok(())
    }

    /// Validate or derive the slug, then check it is free among posts.
    async fn resolve_slug(
        &self,
        title: &str,
        requested: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<String> {
        let slug = match requested {
            Some(s) => {
                if !SLUG_REGEX.is_match(s) {
                    return Err(AppError::Validation(format!(
                        "Slug '{}' must be lowercase alphanumeric with hyphens",
                        s
                    )));
                }
                s.to_string()
            }
            None => {
                let derived = slugify(title);
                if derived.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Title '{}' does not produce a usable slug",
                        title
                    )));
                }
                derived
            }
        };

        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM posts
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(&slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check slug uniqueness: {:?}", e);
            AppError::Database(e)
        })?;

        if taken {
            return Err(AppError::Conflict(format!(
                "Slug '{}' is already in use",
                slug
            )));
        }

        Ok(slug)
    }
}
