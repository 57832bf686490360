//! Generator module - renders the fact-check site into the public directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{extract, Article, ArticleRecord, Category, ContentStore, MarkdownRenderer};
use crate::helpers;
use crate::templates::{ArticleCard, SiteData, TemplateRenderer, TopicData};
use crate::KloptDat;

/// Meta description used when an article has none
const DEFAULT_DESCRIPTION: &str = "Factcheck artikel op KloptDat.be";

/// Static site generator using Tera templates
pub struct Generator {
    site: KloptDat,
    store: ContentStore,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &KloptDat) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::with_styles(site.config.components.clone());

        Ok(Self {
            site: site.clone(),
            store: ContentStore::for_site(site),
            renderer,
            markdown,
        })
    }

    /// The content store pages are rendered from
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<()> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        self.copy_static_assets()?;

        let articles = self.store.list_articles();
        tracing::info!("Found {} articles", articles.len());

        write_page(&public_dir.join("index.html"), &self.render_index_page(&articles)?)?;

        for record in &articles {
            let article = match self.store.load_article(&record.slug) {
                Ok(article) => article,
                Err(e) => {
                    // Fallback listings name articles that have no file
                    tracing::warn!("Skipping article page {}: {}", record.slug, e);
                    continue;
                }
            };
            let html = self.render_article_page(&article, &articles)?;
            write_page(
                &public_dir
                    .join("articles")
                    .join(&record.slug)
                    .join("index.html"),
                &html,
            )?;
        }

        for category in Category::ALL {
            let html = self.render_topic_page(category, &articles)?;
            write_page(
                &public_dir
                    .join("topics")
                    .join(category.as_str())
                    .join("index.html"),
                &html,
            )?;
        }

        write_page(&public_dir.join("404.html"), &self.render_not_found_page()?)?;

        self.generate_json_index(&articles)?;

        Ok(())
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::new(&self.site.config));
        context
    }

    fn cards<'a, I>(&self, records: I) -> Vec<ArticleCard>
    where
        I: IntoIterator<Item = &'a ArticleRecord>,
    {
        records
            .into_iter()
            .map(|r| ArticleCard::new(&self.site.config, r))
            .collect()
    }

    /// Home page with every article, newest first
    pub fn render_index_page(&self, articles: &[ArticleRecord]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("page_title", &self.site.config.title);
        context.insert("articles", &self.cards(articles));
        self.renderer.render("index.html", &context)
    }

    /// Rendered HTML body of an article, without the title and date lines
    pub fn render_body(&self, article: &Article) -> String {
        self.markdown.render(&extract::strip_header(&article.body))
    }

    /// Article page. `articles` is the full listing, used for related links.
    pub fn render_article_page(
        &self,
        article: &Article,
        articles: &[ArticleRecord],
    ) -> Result<String> {
        let record = &article.record;
        let related = articles
            .iter()
            .filter(|r| r.category == record.category && r.slug != record.slug)
            .take(self.site.config.related_count);

        let description = record
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);

        let canonical = helpers::full_url_for(
            &self.site.config,
            &format!("articles/{}/", helpers::encode_segment(&record.slug)),
        );

        let mut context = self.base_context();
        context.insert("article", &ArticleCard::new(&self.site.config, record));
        context.insert("canonical", &helpers::html_escape(&canonical));
        context.insert("content", &self.render_body(article));
        context.insert("description", &helpers::html_escape(description));
        context.insert("related", &self.cards(related));
        self.renderer.render("article.html", &context)
    }

    /// Listing filtered to one category
    pub fn render_topic_page(
        &self,
        category: Category,
        articles: &[ArticleRecord],
    ) -> Result<String> {
        let mut context = self.base_context();
        context.insert("topic", &TopicData::new(&self.site.config, category));
        context.insert(
            "articles",
            &self.cards(articles.iter().filter(|r| r.category == category)),
        );
        self.renderer.render("topic.html", &context)
    }

    pub fn render_not_found_page(&self) -> Result<String> {
        self.renderer.render("not_found.html", &self.base_context())
    }

    /// Write the listing as `articles.json`
    fn generate_json_index(&self, articles: &[ArticleRecord]) -> Result<()> {
        let output_path = self.site.public_dir.join("articles.json");
        let json = serde_json::to_string_pretty(articles)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated articles.json");
        Ok(())
    }

    /// Copy the static directory (images, css) into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.is_dir() {
            tracing::debug!("No static directory at {:?}", static_dir);
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CHOCOLADE: &str = "# Eet Vlaanderen de meeste chocolade?\n\n\
**Gepubliceerd op: 15 april 2025**\n\n\
![Chocolade](/images/chocolade.svg)\n\n\
Belgen zouden de grootste chocoladeliefhebbers zijn.\n\n\
## De bewering:\n\n**NIET WAAR.** Dat klopt niet.\n";

    const BEGROTING: &str = "# Begrotingstekort daalt\n\n\
**Gepubliceerd op: 20 april 2025**\n\n\
Het tekort is gedaald.\n\n\
## De bewering:\n\n**WAAR.** Het klopt.\n";

    const SUBSIDIES: &str = "# Begroting en subsidies\n\n\
**Gepubliceerd op: 10 april 2025**\n\n\
Over subsidies.\n\n\
## De bewering:\n\n**GEDEELTELIJK WAAR.** Deels.\n";

    fn setup() -> (TempDir, KloptDat) {
        let dir = TempDir::new().unwrap();
        let site = KloptDat::new(dir.path()).unwrap();
        for (slug, body) in [
            ("chocolade", CHOCOLADE),
            ("begroting", BEGROTING),
            ("begroting-subsidies", SUBSIDIES),
        ] {
            let article_dir = site.articles_dir.join(slug);
            fs::create_dir_all(&article_dir).unwrap();
            fs::write(article_dir.join("page.mdx"), body).unwrap();
        }
        (dir, site)
    }

    #[test]
    fn test_generate_writes_site() {
        let (_dir, site) = setup();
        fs::create_dir_all(site.static_dir.join("images")).unwrap();
        fs::write(site.static_dir.join("images/logo.svg"), "<svg/>").unwrap();

        Generator::new(&site).unwrap().generate().unwrap();

        let public = &site.public_dir;
        assert!(public.join("index.html").exists());
        assert!(public.join("articles/chocolade/index.html").exists());
        assert!(public.join("articles/begroting/index.html").exists());
        for category in Category::ALL {
            assert!(public
                .join("topics")
                .join(category.as_str())
                .join("index.html")
                .exists());
        }
        assert!(public.join("404.html").exists());
        assert!(public.join("images/logo.svg").exists());

        let json = fs::read_to_string(public.join("articles.json")).unwrap();
        let listed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        let slugs: Vec<&str> = listed.iter().map(|v| v["slug"].as_str().unwrap()).collect();
        assert_eq!(slugs, ["begroting", "chocolade", "begroting-subsidies"]);
        assert_eq!(listed[0]["imageUrl"], "/images/default.svg");
    }

    #[test]
    fn test_index_lists_newest_first() {
        let (_dir, site) = setup();
        let generator = Generator::new(&site).unwrap();
        let html = generator
            .render_index_page(&generator.store().list_articles())
            .unwrap();
        let begroting = html.find("Begrotingstekort daalt").unwrap();
        let chocolade = html.find("Eet Vlaanderen de meeste chocolade?").unwrap();
        assert!(begroting < chocolade);
        assert!(html.contains("Lees meer"));
    }

    #[test]
    fn test_article_page() {
        let (_dir, site) = setup();
        let generator = Generator::new(&site).unwrap();
        let articles = generator.store().list_articles();
        let article = generator.store().load_article("begroting").unwrap();
        let html = generator.render_article_page(&article, &articles).unwrap();

        // title line is rendered by the header only
        assert_eq!(html.matches("<h1").count(), 1);
        assert!(html.contains("Begrotingstekort daalt"));
        assert!(html.contains(r#"<h2 class="text-xl font-semibold my-3">De bewering:</h2>"#));
        assert!(html.contains(DEFAULT_DESCRIPTION));
        assert!(html.contains(r#"<link rel="canonical" href="https://kloptdat.be/articles/begroting/">"#));
        // same category, itself excluded
        assert!(html.contains(r#"href="/articles/begroting-subsidies/""#));
        assert!(!html.contains(r#"href="/articles/chocolade/""#));
    }

    #[test]
    fn test_topic_page_filters_by_category() {
        let (_dir, site) = setup();
        let generator = Generator::new(&site).unwrap();
        let articles = generator.store().list_articles();

        let html = generator
            .render_topic_page(Category::Economie, &articles)
            .unwrap();
        assert!(html.contains("Begrotingstekort daalt"));
        assert!(!html.contains("chocolade?"));

        let html = generator
            .render_topic_page(Category::Europa, &articles)
            .unwrap();
        assert!(html.contains("Er zijn nog geen factchecks"));
    }

    #[test]
    fn test_not_found_page() {
        let (_dir, site) = setup();
        let html = Generator::new(&site)
            .unwrap()
            .render_not_found_page()
            .unwrap();
        assert!(html.contains("Artikel niet gevonden"));
    }
}
