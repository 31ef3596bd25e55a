use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto, MeDto, TotpSetupResponseDto};
use crate::features::auth::services::{password, totp, TokenService};
use crate::features::users::models::User;

/// Service for local password + TOTP authentication
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
    totp_issuer: String,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>, totp_issuer: String) -> Self {
        Self {
            pool,
            tokens,
            totp_issuer,
        }
    }

    /// Verify credentials (and the TOTP code when enabled) and issue a token.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let user = self
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

        if !password::verify_password(&user.password_hash, &dto.password)? {
            return Err(AppError::Auth("Invalid email or password".to_string()));
        }

        if user.totp_enabled {
            let secret = user.totp_secret.as_deref().ok_or_else(|| {
                AppError::Internal("Account has 2FA enabled but no secret stored".to_string())
            })?;
            let code = dto
                .totp_code
                .as_deref()
                .ok_or_else(|| AppError::Auth("Verification code required".to_string()))?;
            if !totp::verify(secret, code, unix_now())? {
                return Err(AppError::Auth("Invalid verification code".to_string()));
            }
        }

        let (access_token, expires_in) =
            self.tokens.issue_token(user.id, &user.email, &user.roles)?;

        tracing::info!("Login succeeded: user={}", user.id);

        Ok(LoginResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: user.into(),
        })
    }

    /// Current account details for the authenticated user
    pub async fn me(&self, user_id: Uuid) -> Result<MeDto> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;
        Ok(user.into())
    }

    /// Generate and store a new TOTP secret for the account.
    ///
    /// The secret stays inactive until the first code is confirmed via
    /// `totp_activate`; re-running setup replaces any previous secret.
    pub async fn totp_setup(&self, user_id: Uuid) -> Result<TotpSetupResponseDto> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        let secret = totp::generate_secret();

        sqlx::query(
            r#"
            UPDATE users
            SET totp_secret = $1, totp_enabled = FALSE, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(&secret)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store TOTP secret: {:?}", e);
            AppError::Database(e)
        })?;

        let otpauth_uri = totp::otpauth_uri(&self.totp_issuer, &user.email, &secret);

        Ok(TotpSetupResponseDto {
            secret,
            otpauth_uri,
        })
    }

    /// Confirm the first code from the authenticator app and enable 2FA.
    pub async fn totp_activate(&self, user_id: Uuid, code: &str) -> Result<()> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        let secret = user.totp_secret.as_deref().ok_or_else(|| {
            AppError::BadRequest("Run two-factor setup before activating".to_string())
        })?;

        if !totp::verify(secret, code, unix_now())? {
            return Err(AppError::BadRequest(
                "Invalid verification code".to_string(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE users
            SET totp_enabled = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to enable 2FA: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Two-factor authentication enabled: user={}", user_id);

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, password_hash, roles,
                   totp_secret, totp_enabled, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by email: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, password_hash, roles,
                   totp_secret, totp_enabled, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by id: {:?}", e);
            AppError::Database(e)
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
