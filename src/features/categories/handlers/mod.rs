pub mod admin_category_handler;
pub mod category_handler;

pub use admin_category_handler::{
    __path_create_category, __path_delete_category, __path_reparent_categories,
    __path_update_category, create_category, delete_category, reparent_categories,
    update_category,
};
pub use category_handler::{__path_get_category, __path_list_categories, get_category, list_categories};
