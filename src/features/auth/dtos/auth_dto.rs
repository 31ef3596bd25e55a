use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::User;

/// Credentials for the login endpoint
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,

    /// Required when the account has two-factor authentication enabled
    pub totp_code: Option<String>,
}

/// Authenticated account, as returned to the admin UI
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeDto {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub totp_enabled: bool,
}

impl From<User> for MeDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            roles: u.roles,
            totp_enabled: u.totp_enabled,
        }
    }
}

/// Successful login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: MeDto,
}

/// Newly generated two-factor secret, shown once during enrolment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotpSetupResponseDto {
    pub secret: String,
    pub otpauth_uri: String,
}

/// First code confirming the authenticator app is set up
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TotpActivateRequestDto {
    #[validate(length(min = 6, max = 6, message = "code must be 6 digits"))]
    pub code: String,
}
