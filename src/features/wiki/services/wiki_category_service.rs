use std::collections::HashMap;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::wiki::dtos::{
    CreateWikiCategoryDto, UpdateWikiCategoryDto, WikiCategoryResponseDto, WikiCategoryTreeDto,
    WikiReparentUpdateDto,
};
use crate::features::wiki::models::WikiCategory;
use crate::shared::hierarchy;
use crate::shared::slug::slugify;
use crate::shared::validation::SLUG_REGEX;

const SELECT_COLUMNS: &str = "id, parent_id, name, slug, description, icon, color, \
                              display_order, created_at, updated_at";

/// Service for wiki category operations.
///
/// Same hierarchy semantics as blog categories; the dependent content
/// gating deletion is wiki articles instead of posts.
pub struct WikiCategoryService {
    pool: PgPool,
}

impl WikiCategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all wiki categories (flat list)
    pub async fn list(&self) -> Result<Vec<WikiCategoryResponseDto>> {
        let categories = self.fetch_all().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all wiki categories as a tree
    pub async fn list_tree(&self) -> Result<Vec<WikiCategoryTreeDto>> {
        let categories = self.fetch_all().await?;
        Ok(hierarchy::build_forest(categories)
            .into_iter()
            .map(WikiCategoryTreeDto::from_tree)
            .collect())
    }

    /// Get wiki category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<WikiCategoryResponseDto> {
        let category = sqlx::query_as::<_, WikiCategory>(&format!(
            "SELECT {SELECT_COLUMNS} FROM wiki_categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get wiki category by slug: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Wiki category '{}' not found", slug)))
    }

    /// Create a wiki category; the slug is derived from the name when omitted
    pub async fn create(&self, dto: CreateWikiCategoryDto) -> Result<WikiCategoryResponseDto> {
        let slug = self
            .resolve_slug(&dto.name, dto.slug.as_deref(), None)
            .await?;

        if let Some(parent_id) = dto.parent_id {
            if !self.exists(parent_id).await? {
                return Err(AppError::NotFound(format!(
                    "Parent wiki category {} not found",
                    parent_id
                )));
            }
        }

        let category = sqlx::query_as::<_, WikiCategory>(&format!(
            r#"
            INSERT INTO wiki_categories (parent_id, name, slug, description, icon, color, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(dto.parent_id)
        .bind(&dto.name)
        .bind(&slug)
        .bind(&dto.description)
        .bind(&dto.icon)
        .bind(&dto.color)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert wiki category: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Wiki category created: id={}, slug={}",
            category.id,
            category.slug
        );

        Ok(category.into())
    }

    /// Update a wiki category
    pub async fn update(
        &self,
        id: i64,
        dto: UpdateWikiCategoryDto,
    ) -> Result<WikiCategoryResponseDto> {
        let existing = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Wiki category {} not found", id)))?;

        let name = dto.name.unwrap_or(existing.name);
        let slug = match dto.slug {
            Some(requested) => self.resolve_slug(&name, Some(&requested), Some(id)).await?,
            None => existing.slug,
        };
        let description = dto.description.or(existing.description);
        let icon = dto.icon.or(existing.icon);
        let color = dto.color.or(existing.color);
        let display_order = dto.display_order.unwrap_or(existing.display_order);

        let parent_id = match dto.parent_id {
            Some(new_parent) => {
                if new_parent != existing.parent_id {
                    let current = self.fetch_parent_map().await?;
                    hierarchy::plan_reparent(&[(id, new_parent)], &current)?;
                }
                new_parent
            }
            None => existing.parent_id,
        };

        let category = sqlx::query_as::<_, WikiCategory>(&format!(
            r#"
            UPDATE wiki_categories
            SET parent_id = $1, name = $2, slug = $3, description = $4,
                icon = $5, color = $6, display_order = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(parent_id)
        .bind(&name)
        .bind(&slug)
        .bind(&description)
        .bind(&icon)
        .bind(&color)
        .bind(display_order)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update wiki category {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(category.into())
    }

    /// Apply a batch of parent moves atomically (see `CategoryService::reparent`)
    pub async fn reparent(
        &self,
        updates: Vec<WikiReparentUpdateDto>,
    ) -> Result<Vec<WikiCategoryTreeDto>> {
        let pairs: Vec<(i64, Option<i64>)> =
            updates.iter().map(|u| (u.id, u.parent_id)).collect();

        let current = self.fetch_parent_map().await?;
        hierarchy::plan_reparent(&pairs, &current)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin reparent transaction: {:?}", e);
            AppError::Database(e)
        })?;

        for (id, parent_id) in &pairs {
            sqlx::query(
                "UPDATE wiki_categories SET parent_id = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(parent_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to reparent wiki category {}: {:?}", id, e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit reparent transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Reparented {} wiki categories", pairs.len());

        self.list_tree().await
    }

    /// Delete a wiki category.
    ///
    /// Blocked while articles are attached; child categories do not block
    /// and are promoted to roots by the next tree read.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.exists(id).await? {
            return Err(AppError::NotFound(format!("Wiki category {} not found", id)));
        }

        let article_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM wiki_articles WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count articles for wiki category {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        if article_count > 0 {
            return Err(AppError::Conflict(format!(
                "Wiki category has {} article(s) attached and cannot be deleted",
                article_count
            )));
        }

        let child_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM wiki_categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count children for wiki category {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        if child_count > 0 {
            tracing::warn!(
                category_id = id,
                child_count,
                "deleting a wiki category with children; they will surface as roots"
            );
        }

        sqlx::query("DELETE FROM wiki_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete wiki category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Wiki category deleted: id={}", id);

        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<WikiCategory>> {
        sqlx::query_as::<_, WikiCategory>(&format!(
            "SELECT {SELECT_COLUMNS} FROM wiki_categories ORDER BY display_order, name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list wiki categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<WikiCategory>> {
        sqlx::query_as::<_, WikiCategory>(&format!(
            "SELECT {SELECT_COLUMNS} FROM wiki_categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch wiki category {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM wiki_categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check wiki category {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn fetch_parent_map(&self) -> Result<HashMap<i64, Option<i64>>> {
        let rows: Vec<(i64, Option<i64>)> =
            sqlx::query_as("SELECT id, parent_id FROM wiki_categories")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch wiki category parents: {:?}", e);
                    AppError::Database(e)
                })?;
        Ok(rows.into_iter().collect())
    }

    async fn resolve_slug(
        &self,
        name: &str,
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
                let derived = slugify(name);
                if derived.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Name '{}' does not produce a usable slug",
                        name
                    )));
                }
                derived
            }
        };

        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM wiki_categories
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
