use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::posts::{
    dtos as posts_dtos, handlers as posts_handlers, models as posts_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::features::wiki::{
    dtos as wiki_dtos, handlers as wiki_handlers, models as wiki_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::get_me,
        auth_handlers::totp_setup,
        auth_handlers::totp_activate,
        // Users
        users_handlers::list_users,
        users_handlers::create_user,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::reparent_categories,
        categories_handlers::delete_category,
        // Posts
        posts_handlers::list_posts,
        posts_handlers::get_post,
        posts_handlers::list_all_posts,
        posts_handlers::get_post_by_id,
        posts_handlers::create_post,
        posts_handlers::update_post,
        posts_handlers::delete_post,
        // Wiki
        wiki_handlers::list_wiki_categories,
        wiki_handlers::get_wiki_category,
        wiki_handlers::list_wiki_category_articles,
        wiki_handlers::get_wiki_article,
        wiki_handlers::create_wiki_category,
        wiki_handlers::update_wiki_category,
        wiki_handlers::reparent_wiki_categories,
        wiki_handlers::delete_wiki_category,
        wiki_handlers::list_all_wiki_articles,
        wiki_handlers::get_wiki_article_by_id,
        wiki_handlers::create_wiki_article,
        wiki_handlers::update_wiki_article,
        wiki_handlers::reparent_wiki_articles,
        wiki_handlers::delete_wiki_article,
        // Dashboard
        dashboard_handlers::get_dashboard,
    ),
    components(
        schemas(
            Meta,
            auth_model::AuthenticatedUser,
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::MeDto,
            auth_dtos::TotpSetupResponseDto,
            auth_dtos::TotpActivateRequestDto,
            users_dtos::UserResponseDto,
            users_dtos::CreateUserDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::ReparentUpdateDto,
            categories_dtos::ReparentRequestDto,
            posts_models::PostStatus,
            posts_dtos::PostResponseDto,
            posts_dtos::PostSummaryDto,
            posts_dtos::CreatePostDto,
            posts_dtos::UpdatePostDto,
            wiki_models::ArticleStatus,
            wiki_dtos::WikiCategoryResponseDto,
            wiki_dtos::WikiCategoryTreeDto,
            wiki_dtos::CreateWikiCategoryDto,
            wiki_dtos::UpdateWikiCategoryDto,
            wiki_dtos::WikiReparentUpdateDto,
            wiki_dtos::WikiReparentRequestDto,
            wiki_dtos::WikiArticleResponseDto,
            wiki_dtos::WikiArticleSummaryDto,
            wiki_dtos::WikiArticleTreeDto,
            wiki_dtos::CreateWikiArticleDto,
            wiki_dtos::UpdateWikiArticleDto,
            dashboard_dtos::DashboardSummaryDto,
            dashboard_dtos::RecentPostDto,
            dashboard_handlers::DashboardDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::MeDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            ApiResponse<Vec<posts_dtos::PostSummaryDto>>,
            ApiResponse<posts_dtos::PostResponseDto>,
            ApiResponse<Vec<wiki_dtos::WikiCategoryResponseDto>>,
            ApiResponse<Vec<wiki_dtos::WikiArticleTreeDto>>,
            ApiResponse<wiki_dtos::WikiArticleResponseDto>,
            ApiResponse<dashboard_handlers::DashboardDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Account management (admin only)"),
        (name = "categories", description = "Blog categories (public reads, editor writes)"),
        (name = "posts", description = "Blog posts (public reads, editor writes)"),
        (name = "wiki", description = "Wiki categories and articles"),
        (name = "dashboard", description = "Admin content statistics"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Vademecum API",
        version = "0.1.0",
        description = "API documentation for Vademecum",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
