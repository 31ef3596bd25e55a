pub mod admin_post_handler;
pub mod post_handler;

pub use admin_post_handler::{
    __path_create_post, __path_delete_post, __path_get_post_by_id, __path_list_all_posts,
    __path_update_post, create_post, delete_post, get_post_by_id, list_all_posts, update_post,
};
pub use post_handler::{__path_get_post, __path_list_posts, get_post, list_posts};
