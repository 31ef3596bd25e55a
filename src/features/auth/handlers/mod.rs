pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_login, __path_totp_activate, __path_totp_setup, get_me, login,
    totp_activate, totp_setup,
};
