//! Article models

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::helpers;

/// Fact-check verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    True,
    PartlyTrue,
    False,
    #[default]
    Misleading,
}

impl Rating {
    pub const ALL: [Rating; 4] = [
        Rating::True,
        Rating::PartlyTrue,
        Rating::False,
        Rating::Misleading,
    ];

    /// Dutch label shown on badges
    pub fn label(self) -> &'static str {
        match self {
            Rating::True => "WAAR",
            Rating::PartlyTrue => "GEDEELTELIJK WAAR",
            Rating::False => "NIET WAAR",
            Rating::Misleading => "MISLEIDEND",
        }
    }

    /// Enumeration name, as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::True => "TRUE",
            Rating::PartlyTrue => "PARTLY_TRUE",
            Rating::False => "FALSE",
            Rating::Misleading => "MISLEADING",
        }
    }

    /// CSS class for the rating badge
    pub fn css_class(self) -> &'static str {
        match self {
            Rating::True => "bg-green-100 text-green-800",
            Rating::PartlyTrue => "bg-yellow-100 text-yellow-800",
            Rating::False => "bg-red-100 text-red-800",
            Rating::Misleading => "bg-orange-100 text-orange-800",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rating {
    type Err = String;

    /// Accepts enumeration names and Dutch or English labels, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_end_matches('.')
            .to_uppercase()
            .replace(['_', '-'], " ");
        match normalized.as_str() {
            "TRUE" | "WAAR" => Ok(Rating::True),
            "PARTLY TRUE" | "GEDEELTELIJK WAAR" => Ok(Rating::PartlyTrue),
            "FALSE" | "NIET WAAR" => Ok(Rating::False),
            "MISLEADING" | "MISLEIDEND" => Ok(Rating::Misleading),
            _ => Err(format!("unknown rating: {}", s)),
        }
    }
}

/// Article topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Politiek,
    Economie,
    Europa,
    Social,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Politiek,
        Category::Economie,
        Category::Europa,
        Category::Social,
    ];

    /// URL segment and serialized name
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Politiek => "politiek",
            Category::Economie => "economie",
            Category::Europa => "europa",
            Category::Social => "social",
        }
    }

    /// Navigation label
    pub fn label(self) -> &'static str {
        match self {
            Category::Politiek => "Politiek",
            Category::Economie => "Economie",
            Category::Europa => "Europa",
            Category::Social => "Sociale Media",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the Dutch names and their English equivalents
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "politiek" | "politics" => Ok(Category::Politiek),
            "economie" | "economy" => Ok(Category::Economie),
            "europa" | "europe" => Ok(Category::Europa),
            "social" | "sociaal" | "sociale media" => Ok(Category::Social),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

/// Metadata derived for one fact-check article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Directory name; unique within the store
    pub slug: String,

    pub title: String,

    /// Publication date as written in the article
    pub date: String,

    /// The claim under review, on one line
    pub excerpt: String,

    pub rating: Rating,

    pub image_url: String,

    pub category: Category,

    /// Page meta description (front-matter only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Other front-matter keys, in declaration order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl ArticleRecord {
    /// Minimal record used when an article cannot be read
    pub fn placeholder(slug: &str, date: String, image_url: &str, category: Category) -> Self {
        Self {
            slug: slug.to_string(),
            title: slug.to_string(),
            date,
            excerpt: String::new(),
            rating: Rating::Misleading,
            image_url: image_url.to_string(),
            category,
            description: None,
            extra: IndexMap::new(),
        }
    }

    /// Publication date, if it can be parsed
    pub fn published(&self) -> Option<chrono::NaiveDate> {
        helpers::parse_date(&self.date)
    }
}

/// A single article loaded for rendering
#[derive(Debug, Clone)]
pub struct Article {
    pub record: ArticleRecord,

    /// Content without front-matter
    pub body: String,
}

/// Listing served when the content store cannot be read at all
pub fn fallback_articles(default_image: &str) -> Vec<ArticleRecord> {
    let entry = |slug: &str, title: &str, date: &str, excerpt: &str, rating, category| {
        ArticleRecord {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            excerpt: excerpt.to_string(),
            rating,
            image_url: default_image.to_string(),
            category,
            description: None,
            extra: IndexMap::new(),
        }
    };

    vec![
        entry(
            "chocolade",
            "Is chocolade gezond?",
            "25 april 2025",
            "\"Chocolade is goed voor je gezondheid\" - Vaak gedeeld op sociale media",
            Rating::PartlyTrue,
            Category::Politiek,
        ),
        entry(
            "begroting",
            "Vlaams begrotingstekort is historisch laag",
            "20 april 2025",
            "\"Het Vlaams begrotingstekort is gedaald naar het laagste niveau sinds 2008\"",
            Rating::True,
            Category::Economie,
        ),
        entry(
            "eu-landbouwsubsidies",
            "Vlaanderen krijgt het meeste EU-landbouwgeld",
            "12 april 2025",
            "\"Geen enkele regio krijgt meer Europese landbouwsubsidies dan Vlaanderen\"",
            Rating::False,
            Category::Europa,
        ),
        entry(
            "sociale-media-stemgedrag",
            "TikTok bepaalt hoe jongeren stemmen",
            "5 april 2025",
            "\"De helft van de jonge kiezers baseert zijn stem op TikTok-filmpjes\"",
            Rating::Misleading,
            Category::Social,
        ),
    ]
}
