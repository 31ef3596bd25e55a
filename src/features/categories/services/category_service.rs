use std::collections::HashMap;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, ReparentUpdateDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::shared::hierarchy;
use crate::shared::slug::slugify;
use crate::shared::validation::SLUG_REGEX;

const SELECT_COLUMNS: &str =
    "id, parent_id, name, slug, description, display_order, created_at, updated_at";

/// Service for blog category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories (flat list)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.fetch_all().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all categories as a tree
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.fetch_all().await?;
        Ok(hierarchy::build_forest(categories)
            .into_iter()
            .map(CategoryTreeDto::from_tree)
            .collect())
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {SELECT_COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by slug: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Create a category; the slug is derived from the name when omitted
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let slug = self.resolve_slug(&dto.name, dto.slug.as_deref(), None).await?;

        if let Some(parent_id) = dto.parent_id {
            if !self.exists(parent_id).await? {
                return Err(AppError::NotFound(format!(
                    "Parent category {} not found",
                    parent_id
                )));
            }
        }

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (parent_id, name, slug, description, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(dto.parent_id)
        .bind(&dto.name)
        .bind(&slug)
        .bind(&dto.description)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert category: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Category created: id={}, slug={}", category.id, category.slug);

        Ok(category.into())
    }

    /// Update name, slug, description, ordering or parent of a category
    pub async fn update(&self, id: i64, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let existing = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        let name = dto.name.unwrap_or(existing.name);
        let slug = match dto.slug {
            Some(requested) => self.resolve_slug(&name, Some(&requested), Some(id)).await?,
            None => existing.slug,
        };
        let description = dto.description.or(existing.description);
        let display_order = dto.display_order.unwrap_or(existing.display_order);

        // A parent change goes through the same planner as drag-and-drop,
        // so self-parenting and ancestor loops are rejected before any write.
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

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET parent_id = $1, name = $2, slug = $3, description = $4,
                display_order = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(parent_id)
        .bind(&name)
        .bind(&slug)
        .bind(&description)
        .bind(display_order)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(category.into())
    }

    /// Apply a batch of parent moves atomically.
    ///
    /// The whole batch is validated against the proposed state first; a
    /// single rejected move leaves every row untouched. Returns the fresh
    /// tree so the caller can re-render after a drag-and-drop.
    pub async fn reparent(&self, updates: Vec<ReparentUpdateDto>) -> Result<Vec<CategoryTreeDto>> {
        let pairs: Vec<(i64, Option<i64>)> =
            updates.iter().map(|u| (u.id, u.parent_id)).collect();

        let current = self.fetch_parent_map().await?;
        hierarchy::plan_reparent(&pairs, &current)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin reparent transaction: {:?}", e);
            AppError::Database(e)
        })?;

        for (id, parent_id) in &pairs {
            sqlx::query("UPDATE categories SET parent_id = $1, updated_at = NOW() WHERE id = $2")
                .bind(parent_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to reparent category {}: {:?}", id, e);
                    AppError::Database(e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit reparent transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Reparented {} categories", pairs.len());

        self.list_tree().await
    }

    /// Delete a category.
    ///
    /// Blocked while posts are attached. Child categories do not block the
    /// delete and are not cascaded; they are promoted to roots by the next
    /// tree read, and the count is logged here so the condition is visible.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.exists(id).await? {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        let post_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count posts for category {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        if post_count > 0 {
            return Err(AppError::Conflict(format!(
                "Category has {} post(s) attached and cannot be deleted",
                post_count
            )));
        }

        let child_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count children for category {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        if child_count > 0 {
            tracing::warn!(
                category_id = id,
                child_count,
                "deleting a category with children; they will surface as roots"
            );
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {SELECT_COLUMNS} FROM categories ORDER BY display_order, name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {SELECT_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch category {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check category {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn fetch_parent_map(&self) -> Result<HashMap<i64, Option<i64>>> {
        let rows: Vec<(i64, Option<i64>)> =
            sqlx::query_as("SELECT id, parent_id FROM categories")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch category parents: {:?}", e);
                    AppError::Database(e)
                })?;
        Ok(rows.into_iter().collect())
    }

    /// Validate or derive the slug, then check it is free among categories.
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
                SELECT 1 FROM categories
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
