//! Initialize a new KloptDat site

use anyhow::Result;
use std::fs;
use std::path::Path;

use super::new::{scaffold, NewArticle};
use crate::config::SiteConfig;
use crate::content::Rating;
use crate::helpers;

/// Default `_config.yml` written by `init`
const CONFIG_TEMPLATE: &str = r#"# KloptDat.be configuration

# Site
title: KloptDat.be
subtitle: Feiten checken voor Vlaanderen
description: Onafhankelijke factchecking voor Vlaanderen.
author: KloptDat.be
language: nl-BE

# URL
url: https://kloptdat.be
root: /

# Directory
articles_dir: app/articles
content_file: page.mdx
public_dir: public
static_dir: public_static

# Articles
default_image: /images/default.svg
excerpt_length: 160
related_count: 3

# Slug keyword rules, checked in order; the last match wins.
# Articles matching no rule are filed under politiek.
categories:
  - category: europa
    keywords: ["eu-", europa]
  - category: economie
    keywords: [economie, begroting]
  - category: social
    keywords: [sociaal, media]

# Element classes for rendered article bodies
components:
  h1: text-3xl font-bold my-4
  h2: text-xl font-semibold my-3
  p: my-2
"#;

/// Placeholder header image copied into new sites
const DEFAULT_IMAGE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="400" viewBox="0 0 800 400">
  <rect width="800" height="400" fill="#e5e7eb"/>
  <text x="400" y="210" font-family="sans-serif" font-size="40" text-anchor="middle" fill="#6b7280">KloptDat.be</text>
</svg>
"##;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    let config: SiteConfig = serde_yaml::from_str(CONFIG_TEMPLATE)?;

    fs::create_dir_all(target_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let images_dir = target_dir.join(&config.static_dir).join("images");
    fs::create_dir_all(&images_dir)?;
    fs::write(images_dir.join("default.svg"), DEFAULT_IMAGE_SVG)?;

    // Create a sample article
    let sample = NewArticle {
        title: "Eten Vlamingen de meeste chocolade van Europa?".to_string(),
        rating: Rating::False,
        ..Default::default()
    };
    let sample_dir = target_dir.join(&config.articles_dir).join("chocolade");
    fs::create_dir_all(&sample_dir)?;
    fs::write(
        sample_dir.join(&config.content_file),
        scaffold(&sample, &helpers::today(), &config.default_image),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use crate::KloptDat;
    use tempfile::TempDir;

    #[test]
    fn test_init_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = KloptDat::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "KloptDat.be");
        assert_eq!(site.config.categories.len(), 3);
        assert!(site.static_dir.join("images/default.svg").exists());

        let articles = site.store().list_articles();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].slug, "chocolade");
        assert_eq!(articles[0].rating, Rating::False);
        assert_eq!(articles[0].category, Category::Politiek);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
