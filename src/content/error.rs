//! Content store errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the content store
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content store {path:?} is unreadable: {source}")]
    StoreUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("article {slug} is unreadable: {source}")]
    ArticleUnreadable {
        slug: String,
        #[source]
        source: std::io::Error,
    },

    #[error("article not found: {0}")]
    ArticleNotFound(String),

    #[error("invalid front-matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}
