//! Blog posts.
//!
//! Posts are the dependent content of blog categories: a category cannot
//! be deleted while posts reference it. The public surface only serves
//! published posts; drafts are visible through the admin routes.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PostService;
