pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod posts;
pub mod users;
pub mod wiki;
