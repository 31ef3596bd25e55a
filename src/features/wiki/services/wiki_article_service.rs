use std::collections::HashMap;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::wiki::dtos::{
    CreateWikiArticleDto, UpdateWikiArticleDto, WikiArticleResponseDto, WikiArticleSummaryDto,
    WikiArticleTreeDto, WikiReparentUpdateDto,
};
use crate::features::wiki::models::{ArticleStatus, WikiArticle};
use crate::shared::hierarchy::{self, Tree};
use crate::shared::slug::slugify;
use crate::shared::validation::SLUG_REGEX;

const SELECT_COLUMNS: &str = "id, category_id, parent_id, title, slug, summary, body, \
                              status, display_order, published_at, created_at, updated_at";

/// Service for wiki article operations.
///
/// Articles are dependent content for wiki categories and, at the same
/// time, hierarchy nodes among themselves: every article may have a parent
/// article in the same category, and each category's articles render as a
/// tree.
pub struct WikiArticleService {
    pool: PgPool,
}

impl WikiArticleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Article tree of a wiki category, resolved by category slug.
    ///
    /// The public surface passes `published_only = true`: draft subtrees
    /// are pruned whole, so a draft parent hides its published children
    /// rather than promoting them.
    pub async fn list_tree_by_category(
        &self,
        category_slug: &str,
        published_only: bool,
    ) -> Result<Vec<WikiArticleTreeDto>> {
        let category_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM wiki_categories WHERE slug = $1")
                .bind(category_slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to resolve wiki category slug: {:?}", e);
                    AppError::Database(e)
                })?;
        let category_id = category_id.ok_or_else(|| {
            AppError::NotFound(format!("Wiki category '{}' not found", category_slug))
        })?;

        let articles = sqlx::query_as::<_, WikiArticle>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM wiki_articles
            WHERE category_id = $1
            ORDER BY display_order, title
            "#
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list wiki articles: {:?}", e);
            AppError::Database(e)
        })?;

        let mut forest = hierarchy::build_forest(articles);
        if published_only {
            forest = prune_unpublished(forest);
        }

        Ok(forest
            .into_iter()
            .map(WikiArticleTreeDto::from_tree)
            .collect())
    }

    /// Get a published article by slug
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<WikiArticleResponseDto> {
        let article = sqlx::query_as::<_, WikiArticle>(&format!(
            "SELECT {SELECT_COLUMNS} FROM wiki_articles WHERE slug = $1 AND status = 'published'"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get wiki article by slug: {:?}", e);
            AppError::Database(e)
        })?;

        article
            .map(|a| a.into())
            .ok_or_else(|| AppError::NotFound(format!("Wiki article '{}' not found", slug)))
    }

    /// List articles for the admin dashboard, any status, newest first
    pub async fn list_all(
        &self,
        offset: i64,
        limit: i64,
        category_id: Option<i64>,
    ) -> Result<(Vec<WikiArticleSummaryDto>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM wiki_articles WHERE ($1::BIGINT IS NULL OR category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count wiki articles: {:?}", e);
            AppError::Database(e)
        })?;

        let articles = sqlx::query_as::<_, WikiArticle>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM wiki_articles
            WHERE ($1::BIGINT IS NULL OR category_id = $1)
            ORDER BY updated_at DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(category_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list wiki articles: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((articles.into_iter().map(|a| a.into()).collect(), total))
    }

    /// Get any article by id (admin)
    pub async fn get_by_id(&self, id: i64) -> Result<WikiArticleResponseDto> {
        let article = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Wiki article {} not found", id)))?;
        Ok(article.into())
    }

    /// Create an article; the slug is derived from the title when omitted
    pub async fn create(&self, dto: CreateWikiArticleDto) -> Result<WikiArticleResponseDto> {
        let slug = self
            .resolve_slug(&dto.title, dto.slug.as_deref(), None)
            .await?;

        if let Some(category_id) = dto.category_id {
            self.ensure_category_exists(category_id).await?;
        }
        if let Some(parent_id) = dto.parent_id {
            self.ensure_parent_in_category(parent_id, dto.category_id)
                .await?;
        }

        let status = dto.status.unwrap_or(ArticleStatus::Draft);

        let article = sqlx::query_as::<_, WikiArticle>(&format!(
            r#"
            INSERT INTO wiki_articles
                (category_id, parent_id, title, slug, summary, body, status, display_order, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    CASE WHEN $7 = 'published'::article_status THEN NOW() ELSE NULL END)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(dto.category_id)
        .bind(dto.parent_id)
        .bind(&dto.title)
        .bind(&slug)
        .bind(&dto.summary)
        .bind(&dto.body)
        .bind(status)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert wiki article: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Wiki article created: id={}, slug={}",
            article.id,
            article.slug
        );

        Ok(article.into())
    }

    /// Update an article. Publishing for the first time stamps `published_at`.
    pub async fn update(&self, id: i64, dto: UpdateWikiArticleDto) -> Result<WikiArticleResponseDto> {
        let existing = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Wiki article {} not found", id)))?;

        let title = dto.title.unwrap_or(existing.title);
        let slug = match dto.slug {
            Some(requested) => self.resolve_slug(&title, Some(&requested), Some(id)).await?,
            None => existing.slug,
        };
        let summary = dto.summary.or(existing.summary);
        let body = dto.body.unwrap_or(existing.body);
        let status = dto.status.unwrap_or(existing.status);
        let display_order = dto.display_order.unwrap_or(existing.display_order);

        let category_id = match dto.category_id {
            Some(new_category) => {
                if let Some(category_id) = new_category {
                    self.ensure_category_exists(category_id).await?;
                }
                new_category
            }
            None => existing.category_id,
        };

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
        if let Some(parent_id) = parent_id {
            self.ensure_parent_in_category(parent_id, category_id)
                .await?;
        }

        // An article moved across categories leaves its children behind;
        // they surface as roots of the old category's tree.
        if category_id != existing.category_id {
            let child_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM wiki_articles WHERE parent_id = $1")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to count children for article {}: {:?}", id, e);
                        AppError::Database(e)
                    })?;
            if child_count > 0 {
                tracing::warn!(
                    article_id = id,
                    child_count,
                    "article changed category; its children stay behind as roots"
                );
            }
        }

        let published_at = match (status, existing.published_at) {
            (ArticleStatus::Published, None) => Some(chrono::Utc::now()),
            (_, existing_published_at) => existing_published_at,
        };

        let article = sqlx::query_as::<_, WikiArticle>(&format!(
            r#"
            UPDATE wiki_articles
            SET category_id = $1, parent_id = $2, title = $3, slug = $4, summary = $5,
                body = $6, status = $7, display_order = $8, published_at = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(category_id)
        .bind(parent_id)
        .bind(&title)
        .bind(&slug)
        .bind(&summary)
        .bind(&body)
        .bind(status)
        .bind(display_order)
        .bind(published_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update wiki article {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(article.into())
    }

    /// Apply a batch of parent moves atomically.
    ///
    /// Every proposed parent must be an article of the same category as the
    /// node being moved; the batch is rejected whole on any violation.
    pub async fn reparent(&self, updates: Vec<WikiReparentUpdateDto>) -> Result<()> {
        let pairs: Vec<(i64, Option<i64>)> =
            updates.iter().map(|u| (u.id, u.parent_id)).collect();

        let rows: Vec<(i64, Option<i64>, Option<i64>)> =
            sqlx::query_as("SELECT id, parent_id, category_id FROM wiki_articles")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch wiki article parents: {:?}", e);
                    AppError::Database(e)
                })?;

        let current: HashMap<i64, Option<i64>> =
            rows.iter().map(|&(id, parent, _)| (id, parent)).collect();
        let categories: HashMap<i64, Option<i64>> =
            rows.iter().map(|&(id, _, category)| (id, category)).collect();

        hierarchy::plan_reparent(&pairs, &current)?;

        for &(id, parent) in &pairs {
            let Some(parent) = parent else { continue };
            if categories.get(&id) != categories.get(&parent) {
                return Err(AppError::Validation(format!(
                    "Article {} and its proposed parent {} are in different categories",
                    id, parent
                )));
            }
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin reparent transaction: {:?}", e);
            AppError::Database(e)
        })?;

        for (id, parent_id) in &pairs {
            sqlx::query(
                "UPDATE wiki_articles SET parent_id = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(parent_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to reparent wiki article {}: {:?}", id, e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit reparent transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Reparented {} wiki articles", pairs.len());

        Ok(())
    }

    /// Delete an article.
    ///
    /// Child articles do not block the delete; they are promoted to roots
    /// of the category tree by the next read.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.fetch_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Wiki article {} not found", id)));
        }

        let child_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM wiki_articles WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count children for article {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        if child_count > 0 {
            tracing::warn!(
                article_id = id,
                child_count,
                "deleting a wiki article with children; they will surface as roots"
            );
        }

        sqlx::query("DELETE FROM wiki_articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete wiki article {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Wiki article deleted: id={}", id);

        Ok(())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<WikiArticle>> {
        sqlx::query_as::<_, WikiArticle>(&format!(
            "SELECT {SELECT_COLUMNS} FROM wiki_articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch wiki article {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn fetch_parent_map(&self) -> Result<HashMap<i64, Option<i64>>> {
        let rows: Vec<(i64, Option<i64>)> =
            sqlx::query_as("SELECT id, parent_id FROM wiki_articles")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch wiki article parents: {:?}", e);
                    AppError::Database(e)
                })?;
        Ok(rows.into_iter().collect())
    }

    async fn ensure_category_exists(&self, category_id: i64) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM wiki_categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check wiki category {}: {:?}", category_id, e);
                    AppError::Database(e)
                })?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Wiki category {} not found",
                category_id
            )));
        }
        Ok(())
    }

    /// The parent article must exist and belong to the given category.
    async fn ensure_parent_in_category(
        &self,
        parent_id: i64,
        category_id: Option<i64>,
    ) -> Result<()> {
        let parent_category: Option<Option<i64>> =
            sqlx::query_scalar("SELECT category_id FROM wiki_articles WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check parent article {}: {:?}", parent_id, e);
                    AppError::Database(e)
                })?;

        let parent_category = parent_category.ok_or_else(|| {
            AppError::NotFound(format!("Parent article {} not found", parent_id))
        })?;

        if parent_category != category_id {
            return Err(AppError::Validation(format!(
                "Parent article {} is in a different category",
                parent_id
            )));
        }
        Ok(())
    }

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
                SELECT 1 FROM wiki_articles
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

/// Drop draft nodes together with their subtrees.
fn prune_unpublished(forest: Vec<Tree<WikiArticle>>) -> Vec<Tree<WikiArticle>> {
    forest
        .into_iter()
        .filter(|tree| tree.item.status == ArticleStatus::Published)
        .map(|tree| Tree {
            item: tree.item,
            children: prune_unpublished(tree.children),
        })
        .collect()
}
