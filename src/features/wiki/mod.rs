//! Legal wiki: categories and articles.
//!
//! Wiki categories mirror blog categories (plus icon/color presentation
//! attributes for the navigation). Articles belong to a category and form
//! their own tree inside it via `parent_id`, so a category renders as a
//! nested table of contents.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/wiki/categories` | List wiki categories (flat or `?tree=true`) |
//! | GET | `/api/wiki/categories/{slug}` | Get wiki category by slug |
//! | GET | `/api/wiki/categories/{slug}/articles` | Published article tree |
//! | GET | `/api/wiki/articles/{slug}` | Get published article by slug |
//! | POST/PUT/DELETE | `/api/admin/wiki/categories...` | Category management |
//! | POST/PUT/DELETE | `/api/admin/wiki/articles...` | Article management |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{WikiArticleService, WikiCategoryService};
