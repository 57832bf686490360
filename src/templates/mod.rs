//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{MenuItem, SiteConfig};
use crate::content::{ArticleRecord, Category, Rating};
use crate::helpers::{self, html_escape};

/// Template renderer with the embedded KloptDat theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Context values are escaped when they are built (see ArticleCard),
        // so Tera must not escape them a second time.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("kloptdat/layout.html")),
            ("index.html", include_str!("kloptdat/index.html")),
            ("article.html", include_str!("kloptdat/article.html")),
            ("topic.html", include_str!("kloptdat/topic.html")),
            ("not_found.html", include_str!("kloptdat/not_found.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("rating_class", rating_class_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    Ok(tera::Value::String(helpers::truncate(
        &s,
        length,
        Some(&omission),
    )))
}

/// Tera filter: badge classes for a serialized rating
fn rating_class_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("rating_class", "value", String, value);
    let rating: Rating = s.parse().unwrap_or_default();
    Ok(tera::Value::String(rating.css_class().to_string()))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub language: String,
    pub root: String,
    pub excerpt_length: usize,
    pub menu: Vec<MenuItem>,
    pub topics: Vec<TopicData>,
    pub year: String,
}

impl SiteData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: html_escape(&config.title),
            subtitle: html_escape(&config.subtitle),
            description: html_escape(&config.description),
            language: html_escape(&config.language),
            root: helpers::url_for(config, ""),
            excerpt_length: config.excerpt_length,
            menu: config
                .menu
                .iter()
                .map(|item| MenuItem {
                    name: html_escape(&item.name),
                    path: html_escape(&helpers::url_for(config, &item.path)),
                })
                .collect(),
            topics: Category::ALL
                .iter()
                .map(|c| TopicData::new(config, *c))
                .collect(),
            year: chrono::Local::now().format("%Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicData {
    pub name: String,
    pub label: String,
    pub url: String,
}

impl TopicData {
    pub fn new(config: &SiteConfig, category: Category) -> Self {
        Self {
            name: category.as_str().to_string(),
            label: category.label().to_string(),
            url: helpers::topic_url(config, category),
        }
    }
}

/// One article as shown in listings and page headers. Every text field
/// is HTML-escaped.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleCard {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub date: String,
    pub iso_date: Option<String>,
    pub excerpt: String,
    pub rating: Rating,
    pub rating_label: String,
    pub image_url: String,
    pub topic: TopicData,
}

impl ArticleCard {
    pub fn new(config: &SiteConfig, record: &ArticleRecord) -> Self {
        Self {
            slug: html_escape(&record.slug),
            url: html_escape(&helpers::article_url(config, &record.slug)),
            title: html_escape(&record.title),
            date: html_escape(&record.date),
            iso_date: helpers::iso_date(&record.date),
            excerpt: html_escape(&record.excerpt),
            rating: record.rating,
            rating_label: record.rating.label().to_string(),
            image_url: html_escape(&helpers::url_for(config, &record.image_url)),
            topic: TopicData::new(config, record.category),
        }
    }
}
