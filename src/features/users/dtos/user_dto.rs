use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::User;

/// Account as listed in the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub totp_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            roles: u.roles,
            totp_enabled: u.totp_enabled,
            created_at: u.created_at,
        }
    }
}

/// Payload for creating a new account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, max = 120, message = "display_name must be 1-120 characters"))]
    pub display_name: String,

    #[validate(length(min = 10, message = "password must be at least 10 characters"))]
    pub password: String,

    /// Roles granted to the account ("admin", "editor")
    #[validate(length(min = 1, message = "at least one role is required"))]
    pub roles: Vec<String>,
}
