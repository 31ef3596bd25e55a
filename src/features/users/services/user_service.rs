use sqlx::PgPool;

use crate::core::config::BootstrapConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::services::password;
use crate::features::users::dtos::{CreateUserDto, UserResponseDto};
use crate::features::users::models::User;
use crate::shared::constants::{ROLE_ADMIN, ROLE_EDITOR};

/// Service for account management
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List accounts with pagination, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<UserResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, password_hash, roles,
                   totp_secret, totp_enabled, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users.into_iter().map(|u| u.into()).collect(), total))
    }

    /// Create a new account with the given roles
    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        for role in &dto.roles {
            if role != ROLE_ADMIN && role != ROLE_EDITOR {
                return Err(AppError::Validation(format!("Unknown role '{}'", role)));
            }
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(&dto.email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check email uniqueness: {:?}", e);
                    AppError::Database(e)
                })?;
        if exists {
            return Err(AppError::Conflict(format!(
                "An account with email '{}' already exists",
                dto.email
            )));
        }

        let password_hash = password::hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, display_name, password_hash, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, display_name, password_hash, roles,
                      totp_secret, totp_enabled, created_at, updated_at
            "#,
        )
        .bind(&dto.email)
        .bind(&dto.display_name)
        .bind(&password_hash)
        .bind(&dto.roles)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Account created: id={}, email={}", user.id, user.email);

        Ok(user.into())
    }

    /// Seed the first admin account when the users table is empty.
    ///
    /// Without credentials in the environment an empty table is left alone
    /// (the operator may be restoring a dump).
    pub async fn ensure_bootstrap_admin(&self, config: &BootstrapConfig) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        if count > 0 {
            return Ok(());
        }

        let (Some(email), Some(pass)) = (&config.admin_email, &config.admin_password) else {
            tracing::warn!(
                "Users table is empty and no bootstrap admin is configured; \
                 set BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD to seed one"
            );
            return Ok(());
        };

        let created = self
            .create(CreateUserDto {
                email: email.clone(),
                display_name: config.admin_name.clone(),
                password: pass.clone(),
                roles: vec![ROLE_ADMIN.to_string()],
            })
            .await?;

        tracing::info!("Bootstrap admin created: {}", created.email);
        Ok(())
    }
}
