//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::Category;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub articles_dir: String,
    pub content_file: String,
    pub public_dir: String,
    pub static_dir: String,

    // Articles
    pub default_image: String,
    pub excerpt_length: usize,
    pub related_count: usize,
    pub categories: Vec<CategoryRule>,

    // Rendering
    pub components: IndexMap<String, String>,
    pub menu: Vec<MenuItem>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "KloptDat.be".to_string(),
            subtitle: "Feiten checken voor Vlaanderen".to_string(),
            description: "Onafhankelijke factchecking voor Vlaanderen.".to_string(),
            author: "KloptDat.be".to_string(),
            language: "nl-BE".to_string(),

            url: "https://kloptdat.be".to_string(),
            root: "/".to_string(),

            articles_dir: "app/articles".to_string(),
            content_file: "page.mdx".to_string(),
            public_dir: "public".to_string(),
            static_dir: "public_static".to_string(),

            default_image: "/images/default.svg".to_string(),
            excerpt_length: 160,
            related_count: 3,
            categories: default_category_rules(),

            components: default_components(),
            menu: default_menu(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Maps slug fragments onto a category. Rules are evaluated in order and
/// the last matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Whether any keyword occurs in the slug
    pub fn matches(&self, slug: &str) -> bool {
        self.keywords.iter().any(|k| slug.contains(k.as_str()))
    }
}

/// Navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(Category::Europa, &["eu-", "europa"]),
        CategoryRule::new(Category::Economie, &["economie", "begroting"]),
        CategoryRule::new(Category::Social, &["sociaal", "media"]),
    ]
}

fn default_components() -> IndexMap<String, String> {
    [
        ("h1", "text-3xl font-bold my-4"),
        ("h2", "text-xl font-semibold my-3"),
        ("p", "my-2"),
    ]
    .into_iter()
    .map(|(tag, class)| (tag.to_string(), class.to_string()))
    .collect()
}

fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("Home", "/"),
        MenuItem::new("Politiek", "/topics/politiek/"),
        MenuItem::new("Economie", "/topics/economie/"),
        MenuItem::new("Europa", "/topics/europa/"),
        MenuItem::new("Sociale Media", "/topics/social/"),
    ]
}
