//! Role-based authorization guards.
//!
//! These guards extract the authenticated user and verify they have the
//! required roles.
//!
//! Role hierarchy (from highest to lowest):
//! - admin: account management plus everything editors can do
//! - editor: manage categories, posts and wiki content

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for checking if user is admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

/// Guard for checking if user has editor-level access.
///
/// Allows users with the "admin" or "editor" role. Use this for all content
/// management operations.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireEditor(user): RequireEditor) { ... }
/// ```
pub struct RequireEditor(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireEditor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.has_editor_access() {
            return Err(AppError::Forbidden("Editor access required".to_string()));
        }

        Ok(RequireEditor(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin_user, create_editor_user, with_user};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn admin_only(RequireAdmin(_user): RequireAdmin) -> &'static str {
        "ok"
    }

    async fn editor_only(RequireEditor(_user): RequireEditor) -> &'static str {
        "ok"
    }

    fn test_router() -> Router {
        Router::new()
            .route("/admin", get(admin_only))
            .route("/editor", get(editor_only))
    }

    #[tokio::test]
    async fn test_guards_reject_unauthenticated_requests() {
        let server = TestServer::new(test_router()).unwrap();

        let response = server.get("/admin").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = server.get("/editor").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_editor_cannot_reach_admin_routes() {
        let server = TestServer::new(with_user(test_router(), create_editor_user())).unwrap();

        let response = server.get("/admin").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = server.get("/editor").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_reaches_everything() {
        let server = TestServer::new(with_user(test_router(), create_admin_user())).unwrap();

        let response = server.get("/admin").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let response = server.get("/editor").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
