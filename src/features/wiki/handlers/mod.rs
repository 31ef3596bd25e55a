pub mod admin_wiki_handler;
pub mod wiki_handler;

pub use admin_wiki_handler::{
    __path_create_wiki_article, __path_create_wiki_category, __path_delete_wiki_article,
    __path_delete_wiki_category, __path_get_wiki_article_by_id, __path_list_all_wiki_articles,
    __path_reparent_wiki_articles, __path_reparent_wiki_categories, __path_update_wiki_article,
    __path_update_wiki_category, create_wiki_article, create_wiki_category, delete_wiki_article,
    delete_wiki_category, get_wiki_article_by_id, list_all_wiki_articles, reparent_wiki_articles,
    reparent_wiki_categories, update_wiki_article, update_wiki_category,
};
pub use wiki_handler::{
    __path_get_wiki_article, __path_get_wiki_category, __path_list_wiki_categories,
    __path_list_wiki_category_articles, get_wiki_article, get_wiki_category,
    list_wiki_categories, list_wiki_category_articles,
};
