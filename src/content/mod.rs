//! Content module - the article store, metadata extraction and rendering

mod article;
mod error;
pub mod extract;
mod frontmatter;
pub mod loader;
mod markdown;

pub use article::{fallback_articles, Article, ArticleRecord, Category, Rating};
pub use error::ContentError;
pub use extract::ExtractOptions;
pub use frontmatter::FrontMatter;
pub use loader::ContentStore;
pub use markdown::MarkdownRenderer;
