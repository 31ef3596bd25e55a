use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::constants::{ROLE_ADMIN, ROLE_EDITOR};

/// Identity injected into request extensions by the bearer-token middleware.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if user is admin (account management, full content access)
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Check if user has editor-level access (admin or editor)
    pub fn has_editor_access(&self) -> bool {
        self.is_admin() || self.has_role(ROLE_EDITOR)
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// JWT claims carried by locally issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::nil(),
            email: "someone@vademecum.test".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_admin_has_editor_access() {
        let user = user_with_roles(&[ROLE_ADMIN]);
        assert!(user.is_admin());
        assert!(user.has_editor_access());
    }

    #[test]
    fn test_editor_is_not_admin() {
        let user = user_with_roles(&[ROLE_EDITOR]);
        assert!(!user.is_admin());
        assert!(user.has_editor_access());
    }

    #[test]
    fn test_no_roles_no_access() {
        let user = user_with_roles(&[]);
        assert!(!user.is_admin());
        assert!(!user.has_editor_access());
    }
}
