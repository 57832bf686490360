//! List site content

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::{ArticleRecord, Category, Rating};
use crate::KloptDat;

/// List site content by type
pub fn run(site: &KloptDat, content_type: &str) -> Result<()> {
    let articles = site.store().list_articles();

    match content_type {
        "article" | "articles" => {
            println!("Articles ({}):", articles.len());
            for line in article_lines(&articles) {
                println!("  {}", line);
            }
        }
        "category" | "categories" => {
            let counts = count_by(&articles, Category::ALL, |a| a.category);
            println!("Categories ({}):", counts.len());
            for (category, count) in counts {
                println!("  {} ({})", category.label(), count);
            }
        }
        "rating" | "ratings" => {
            let counts = count_by(&articles, Rating::ALL, |a| a.rating);
            println!("Ratings ({}):", counts.len());
            for (rating, count) in counts {
                println!("  {} ({})", rating.label(), count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: articles, categories, ratings",
                content_type
            );
        }
    }

    Ok(())
}

fn article_lines(articles: &[ArticleRecord]) -> Vec<String> {
    articles
        .iter()
        .map(|a| {
            format!(
                "{} - {} [{}] {} ({})",
                a.date,
                a.title,
                a.rating.label(),
                a.slug,
                a.category
            )
        })
        .collect()
}

/// Count articles per key, keeping every key in `keys` order
fn count_by<K, F>(articles: &[ArticleRecord], keys: [K; 4], key: F) -> IndexMap<K, usize>
where
    K: std::hash::Hash + Eq + Copy,
    F: Fn(&ArticleRecord) -> K,
{
    let mut counts: IndexMap<K, usize> = keys.iter().map(|k| (*k, 0)).collect();
    for article in articles {
        *counts.entry(key(article)).or_insert(0) += 1;
    }
    counts
}
