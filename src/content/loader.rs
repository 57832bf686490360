//! Content store - reads articles from the articles directory
//!
//! Layout: `<root>/<slug>/<content_file>`, one directory per article.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::extract::{self, ExtractOptions};
use super::{fallback_articles, Article, ArticleRecord, ContentError, FrontMatter};
use crate::helpers;
use crate::KloptDat;

/// Read-only view over the articles directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    content_file: String,
    options: ExtractOptions,
}

impl ContentStore {
    /// Create a store over `root`
    pub fn new<P: AsRef<Path>>(root: P, content_file: &str, options: ExtractOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            content_file: content_file.to_string(),
            options,
        }
    }

    /// Create the store configured for a site
    pub fn for_site(site: &KloptDat) -> Self {
        Self::new(
            &site.articles_dir,
            &site.config.content_file,
            ExtractOptions::from(&site.config),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the content file for a slug
    pub fn content_path(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join(&self.content_file)
    }

    /// All articles, newest first.
    ///
    /// Never fails: an unreadable article becomes a placeholder record and
    /// an unreadable store yields the fixed fallback listing.
    pub fn list_articles(&self) -> Vec<ArticleRecord> {
        match self.article_slugs() {
            Ok(slugs) => {
                let mut records: Vec<ArticleRecord> =
                    slugs.iter().map(|slug| self.record_or_placeholder(slug)).collect();
                sort_newest_first(&mut records);
                records
            }
            Err(e) => {
                tracing::error!("{}; serving fallback articles", e);
                fallback_articles(&self.options.default_image)
            }
        }
    }

    /// Slugs of every directory holding a content file
    pub fn article_slugs(&self) -> Result<Vec<String>, ContentError> {
        let unreadable = |source: io::Error| ContentError::StoreUnreadable {
            path: self.root.clone(),
            source,
        };

        let metadata = fs::metadata(&self.root).map_err(unreadable)?;
        if !metadata.is_dir() {
            return Err(unreadable(io::Error::new(
                io::ErrorKind::Other,
                "not a directory",
            )));
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(unreadable(e.into_io_error().unwrap_or_else(|| {
                        io::Error::new(io::ErrorKind::Other, "walk failed")
                    })));
                }
                Err(e) => {
                    tracing::warn!("Skipping entry in {:?}: {}", self.root, e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(slug) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 directory {:?}", entry.path());
                continue;
            };
            if is_route_placeholder(slug) || slug.starts_with('.') {
                continue;
            }
            if !entry.path().join(&self.content_file).exists() {
                tracing::debug!("Skipping {}: no {}", slug, self.content_file);
                continue;
            }
            slugs.push(slug.to_string());
        }

        Ok(slugs)
    }

    fn record_or_placeholder(&self, slug: &str) -> ArticleRecord {
        match self.load_article(slug) {
            Ok(article) => article.record,
            Err(e) => {
                tracing::warn!("Failed to load article {}: {}", slug, e);
                ArticleRecord::placeholder(
                    slug,
                    helpers::today(),
                    &self.options.default_image,
                    extract::categorize(slug, &self.options.category_rules),
                )
            }
        }
    }

    /// Load one article by slug.
    ///
    /// A slug that cannot name an article directory (path separators,
    /// `..`, route placeholders) is reported as not found.
    pub fn load_article(&self, slug: &str) -> Result<Article, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::ArticleNotFound(slug.to_string()));
        }

        let path = self.content_path(slug);
        if !path.is_file() {
            return Err(ContentError::ArticleNotFound(slug.to_string()));
        }

        let raw = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ContentError::ArticleNotFound(slug.to_string()),
            _ => ContentError::ArticleUnreadable {
                slug: slug.to_string(),
                source,
            },
        })?;

        let (fm, body) = FrontMatter::parse(&raw)?;
        let record = extract::derive_record(slug, body, &self.options);
        let record = extract::apply_front_matter(record, fm);

        Ok(Article {
            record,
            body: body.to_string(),
        })
    }
}

/// Sort newest first. Unparseable dates go last; ties are ordered by slug.
pub fn sort_newest_first(records: &mut [ArticleRecord]) {
    records.sort_by(|a, b| match (a.published(), b.published()) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    });
}

/// `[slug]`-style dynamic route directories
fn is_route_placeholder(name: &str) -> bool {
    name.starts_with('[') && name.ends_with(']')
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
        && !is_route_placeholder(slug)
}
