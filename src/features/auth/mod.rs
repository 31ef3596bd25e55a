//! Local authentication for the admin dashboard.
//!
//! Accounts live in the `users` table; passwords are Argon2id hashes and
//! an optional TOTP second factor can be enrolled per account. Successful
//! logins receive an HS256 access token signed with the local secret.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::{AuthService, TokenService};
