mod wiki_article_service;
mod wiki_category_service;

pub use wiki_article_service::WikiArticleService;
pub use wiki_category_service::WikiCategoryService;
