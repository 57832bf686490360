//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::{Category, Rating};
use crate::helpers;
use crate::KloptDat;

/// Options for a new article
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    /// Directory name; derived from the title when absent
    pub slug: Option<String>,
    pub rating: Rating,
    /// Stored in front-matter, overriding the slug keyword rules
    pub category: Option<Category>,
}

impl NewArticle {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn slug(&self) -> String {
        match &self.slug {
            Some(s) => slug::slugify(s),
            None => slug::slugify(&self.title),
        }
    }
}

/// Article skeleton with the four fixed sections
pub fn scaffold(article: &NewArticle, date: &str, image: &str) -> String {
    let mut content = String::new();
    if let Some(category) = article.category {
        content.push_str(&format!("---\ncategory: {}\n---\n\n", category));
    }
    content.push_str(&format!(
        r#"# "{title}"

**Gepubliceerd op: {date}**

![{title}]({image})

## De bewering:

Vat hier de bewering samen die gecontroleerd wordt.

## Onze analyse:

Beschrijf hier wat de cijfers en bronnen zeggen.

## Conclusie:

**{rating}.** Leg hier het oordeel uit.

## Bronnen:

1. Eerste bron
"#,
        title = article.title,
        date = date,
        image = image,
        rating = article.rating.label(),
    ));
    content
}

/// Create `<articles_dir>/<slug>/<content_file>`. Refuses to overwrite.
pub fn create_article(site: &KloptDat, article: &NewArticle) -> Result<PathBuf> {
    let slug = article.slug();
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", article.title);
    }

    let target_dir = site.articles_dir.join(&slug);
    let file_path = target_dir.join(&site.config.content_file);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&target_dir)?;
    let content = scaffold(article, &helpers::today(), &site.config.default_image);
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_article() {
        let dir = TempDir::new().unwrap();
        let site = KloptDat::new(dir.path()).unwrap();

        let mut article = NewArticle::new("Verdient een Vlaming écht meer?");
        article.rating = Rating::PartlyTrue;
        let path = create_article(&site, &article).unwrap();
        assert_eq!(
            path,
            site.articles_dir
                .join("verdient-een-vlaming-echt-meer")
                .join("page.mdx")
        );

        let record = site
            .store()
            .load_article("verdient-een-vlaming-echt-meer")
            .unwrap()
            .record;
        assert_eq!(record.title, "Verdient een Vlaming écht meer?");
        assert_eq!(record.rating, Rating::PartlyTrue);
        assert_eq!(record.excerpt, "Vat hier de bewering samen die gecontroleerd wordt.");
        assert!(record.published().is_some());
    }

    #[test]
    fn test_create_article_with_category_and_slug() {
        let dir = TempDir::new().unwrap();
        let site = KloptDat::new(dir.path()).unwrap();

        let article = NewArticle {
            title: "Landbouwsteun".to_string(),
            slug: Some("landbouw steun".to_string()),
            rating: Rating::False,
            category: Some(Category::Europa),
        };
        create_article(&site, &article).unwrap();

        let record = site.store().load_article("landbouw-steun").unwrap().record;
        assert_eq!(record.category, Category::Europa);
        assert_eq!(record.rating, Rating::False);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = KloptDat::new(dir.path()).unwrap();
        let article = NewArticle::new("Dubbel");
        create_article(&site, &article).unwrap();
        assert!(create_article(&site, &article).is_err());
    }
}
