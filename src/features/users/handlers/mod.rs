pub mod user_handler;

pub use user_handler::{__path_create_user, __path_list_users, create_user, list_users};
