use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    LoginRequestDto, LoginResponseDto, MeDto, TotpActivateRequestDto, TotpSetupResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;

/// Log in with email, password and (when enabled) a TOTP code
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login succeeded", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Invalid credentials or verification code")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Current account details
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Authenticated account", body = ApiResponse<MeDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeDto>>> {
    let me = service.me(user.id).await?;
    Ok(Json(ApiResponse::success(Some(me), None, None)))
}

/// Generate a new two-factor secret for the authenticated account
#[utoipa::path(
    post,
    path = "/api/auth/totp/setup",
    responses(
        (status = 200, description = "Secret generated", body = ApiResponse<TotpSetupResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn totp_setup(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<TotpSetupResponseDto>>> {
    let setup = service.totp_setup(user.id).await?;
    Ok(Json(ApiResponse::success(Some(setup), None, None)))
}

/// Confirm the first authenticator code and enable two-factor auth
#[utoipa::path(
    post,
    path = "/api/auth/totp/activate",
    request_body = TotpActivateRequestDto,
    responses(
        (status = 200, description = "Two-factor authentication enabled"),
        (status = 400, description = "Invalid code or setup not run"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn totp_activate(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<TotpActivateRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.totp_activate(user.id, &dto.code).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Two-factor authentication enabled".to_string()),
        None,
    )))
}
