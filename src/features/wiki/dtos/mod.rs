mod wiki_article_dto;
mod wiki_category_dto;

pub use wiki_article_dto::*;
pub use wiki_category_dto::*;
