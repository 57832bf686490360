//! kloptdat: the KloptDat.be fact-check site
//!
//! Reads fact-check articles from `<articles_dir>/<slug>/page.mdx`, derives
//! their metadata (title, date, rating, category, excerpt, image) and renders
//! the site with embedded Tera templates, either to static files or from a
//! development server.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// A KloptDat site rooted at a directory
#[derive(Debug, Clone)]
pub struct KloptDat {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Article directories live here
    pub articles_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets copied verbatim into the output
    pub static_dir: std::path::PathBuf,
}

impl KloptDat {
    /// Open a site from a directory; without `_config.yml` the defaults apply
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let articles_dir = base_dir.join(&config.articles_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            articles_dir,
            public_dir,
            static_dir,
        })
    }

    /// The article store of this site
    pub fn store(&self) -> content::ContentStore {
        content::ContentStore::for_site(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new article
    pub fn new_article(&self, article: &commands::new::NewArticle) -> Result<std::path::PathBuf> {
        commands::new::create_article(self, article)
    }
}
