#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::shared::constants::{ROLE_ADMIN, ROLE_EDITOR};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, Router};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::nil(),
        email: "admin@vademecum.test".to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

#[cfg(test)]
pub fn create_editor_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::nil(),
        email: "editor@vademecum.test".to_string(),
        roles: vec![ROLE_EDITOR.to_string()],
    }
}

/// Layer a router with middleware that injects `user` into every request,
/// standing in for the bearer-token middleware in route tests.
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}
