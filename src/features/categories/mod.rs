//! Blog categories.
//!
//! Categories form a forest via `parent_id`; the tree is rebuilt from flat
//! rows on every read and structural changes are validated by
//! `shared::hierarchy` before anything is persisted.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | List categories (flat or `?tree=true`) |
//! | GET | `/api/categories/{slug}` | Get category by slug |
//! | POST | `/api/admin/categories` | Create category |
//! | PUT | `/api/admin/categories/{id}` | Update category |
//! | POST | `/api/admin/categories/reparent` | Move categories (atomic batch) |
//! | DELETE | `/api/admin/categories/{id}` | Delete category (blocked while posts attached) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
