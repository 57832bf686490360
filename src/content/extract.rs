//! Metadata derivation from article text
//!
//! Articles follow a fixed layout: a level-1 heading with the claim as
//! title, a bolded publication line, a header image, then the sections
//! "De bewering", "Onze analyse", "Conclusie" and "Bronnen". English
//! section names are recognised as well. Every field has a fallback, so a
//! malformed article degrades instead of failing.

use lazy_static::lazy_static;
use regex::Regex;

use super::{ArticleRecord, Category, FrontMatter, Rating};
use crate::config::{CategoryRule, SiteConfig};
use crate::helpers;

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").unwrap();
    static ref DATE_RE: Regex =
        Regex::new(r"(?i)\*\*(?:Gepubliceerd op|Published on):[ \t]*(.+?)\*\*").unwrap();
    static ref CLAIM_RE: Regex =
        Regex::new(r"(?im)^##[ \t]*(?:De bewering|The claim)[ \t]*:").unwrap();
    static ref IMAGE_RE: Regex = Regex::new(r"!\[[^\]]*\]\(\s*<?([^)\s>]+)>?[^)]*\)").unwrap();
    static ref NEWLINES_RE: Regex = Regex::new(r"[\r\n]+").unwrap();
}

/// Bolded verdict markers, checked in order; the first hit wins
const RATING_MARKERS: [(Rating, &[&str]); 3] = [
    (Rating::True, &["**WAAR.**", "**TRUE.**"]),
    (
        Rating::PartlyTrue,
        &["**GEDEELTELIJK WAAR.**", "**PARTLY TRUE.**"],
    ),
    (Rating::False, &["**NIET WAAR.**", "**FALSE.**"]),
];

/// Front-matter keys that would shadow record fields in JSON output
const RESERVED_KEYS: [&str; 2] = ["slug", "content"];

/// Quote pairs stripped from around a title
const QUOTE_PAIRS: [(char, char); 6] = [
    ('"', '"'),
    ('“', '”'),
    ('„', '“'),
    ('„', '”'),
    ('\'', '\''),
    ('‘', '’'),
];

/// Settings that shape the fallbacks
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub default_image: String,
    pub category_rules: Vec<CategoryRule>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

impl From<&SiteConfig> for ExtractOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            default_image: config.default_image.clone(),
            category_rules: config.categories.clone(),
        }
    }
}

/// Title from the first level-1 heading, without wrapping quotes
pub fn extract_title(body: &str) -> Option<String> {
    let (_, heading) = title_heading(body)?;
    let title = strip_quotes(heading.trim()).trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// First level-1 heading outside fenced code, with the offset of its line
fn title_heading(body: &str) -> Option<(usize, &str)> {
    let mut fence: Option<&str> = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if let Some(caps) = TITLE_RE.captures(line) {
            return caps.get(1).map(|m| (start, m.as_str()));
        }
    }
    None
}

fn strip_quotes(s: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = s
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    s
}

/// Date from the bolded publication line
pub fn extract_date(body: &str) -> Option<String> {
    DATE_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Claim text: everything after the claim heading up to the next `##`,
/// newlines collapsed into single spaces.
pub fn extract_excerpt(body: &str) -> Option<String> {
    let heading = CLAIM_RE.find(body)?;
    let rest = &body[heading.end()..];
    let end = rest.find("##").unwrap_or(rest.len());
    let excerpt = NEWLINES_RE.replace_all(&rest[..end], " ");
    let excerpt = excerpt.trim();
    if excerpt.is_empty() {
        None
    } else {
        Some(excerpt.to_string())
    }
}

/// Verdict from the bolded markers anywhere in the body
pub fn extract_rating(body: &str) -> Rating {
    RATING_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| body.contains(*m)))
        .map(|(rating, _)| *rating)
        .unwrap_or_default()
}

/// URL of the first markdown image
pub fn extract_image(body: &str) -> Option<String> {
    IMAGE_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Category from the slug; the last matching rule wins
pub fn categorize(slug: &str, rules: &[CategoryRule]) -> Category {
    rules
        .iter()
        .rev()
        .find(|rule| rule.matches(slug))
        .map(|rule| rule.category)
        .unwrap_or_default()
}

/// Derive a record from the body alone
pub fn derive_record(slug: &str, body: &str, options: &ExtractOptions) -> ArticleRecord {
    ArticleRecord {
        slug: slug.to_string(),
        title: extract_title(body).unwrap_or_else(|| slug.to_string()),
        date: extract_date(body).unwrap_or_else(helpers::today),
        excerpt: extract_excerpt(body).unwrap_or_default(),
        rating: extract_rating(body),
        image_url: extract_image(body).unwrap_or_else(|| options.default_image.clone()),
        category: categorize(slug, &options.category_rules),
        description: None,
        extra: Default::default(),
    }
}

/// Overlay declared front-matter fields on a derived record
pub fn apply_front_matter(mut record: ArticleRecord, fm: FrontMatter) -> ArticleRecord {
    if let Some(title) = fm.title {
        record.title = title;
    }
    if let Some(date) = fm.date {
        record.date = date;
    }
    if let Some(excerpt) = fm.excerpt {
        record.excerpt = excerpt;
    }
    if let Some(image) = fm.image {
        record.image_url = image;
    }
    if let Some(rating) = fm.rating {
        match rating.parse() {
            Ok(rating) => record.rating = rating,
            Err(e) => tracing::warn!("{}: {}, keeping {}", record.slug, e, record.rating),
        }
    }
    if let Some(category) = fm.category {
        match category.parse() {
            Ok(category) => record.category = category,
            Err(e) => tracing::warn!("{}: {}, keeping {}", record.slug, e, record.category),
        }
    }
    record.description = fm.description;
    record.extra = fm.extra;
    for key in RESERVED_KEYS {
        if record.extra.shift_remove(key).is_some() {
            tracing::warn!("{}: front-matter key `{}` is reserved, ignoring it", record.slug, key);
        }
    }
    record
}

/// Body without the parts the page header already shows: the title
/// heading, the publication line and a header image on its own line.
pub fn strip_header(body: &str) -> String {
    let title_line = title_heading(body).map(|(start, _)| start);
    let date_line = DATE_RE.find(body).map(|m| m.start());
    let image_line = IMAGE_RE.find(body).map(|m| m.start());

    let mut out = String::with_capacity(body.len());
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let end = offset;
        let contains = |pos: Option<usize>| pos.is_some_and(|p| p >= start && p < end);

        if contains(title_line) || contains(date_line) {
            continue;
        }
        if contains(image_line) && IMAGE_RE.replace(line.trim(), "").trim().is_empty() {
            continue;
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEGROTING: &str = r#"# "Vlaams begrotingstekort is historisch laag"

**Gepubliceerd op: 20 April 2025**

![Vlaams Begrotingstekort](/images/begroting.svg)

## De bewering:
"Het Vlaams begrotingstekort is gedaald naar het laagste niveau sinds 2008" - Minister-president
tijdens persconferentie

## Onze analyse:
We hebben de officiële begrotingscijfers geanalyseerd.

## Conclusie:
**WAAR.** De bewering van de Minister-president klopt.

## Bronnen:
1. Begrotingscijfers Vlaamse Overheid 2008-2025
"#;

    #[test]
    fn test_derive_dutch_article() {
        let record = derive_record("begroting", BEGROTING, &ExtractOptions::default());
        assert_eq!(record.title, "Vlaams begrotingstekort is historisch laag");
        assert_eq!(record.date, "20 April 2025");
        assert_eq!(record.rating, Rating::True);
        assert_eq!(record.image_url, "/images/begroting.svg");
        assert_eq!(record.category, Category::Economie);
        assert_eq!(
            record.excerpt,
            "\"Het Vlaams begrotingstekort is gedaald naar het laagste niveau sinds 2008\" - Minister-president tijdens persconferentie"
        );
    }

    #[test]
    fn test_derive_english_article() {
        let body = "# \"Test Claim\"\n\n**Published on: 1 January 2025**\n\n## The claim:\nX says Y\n\n## Conclusion:\n**FALSE.** Because Z\n";
        let record = derive_record("test-claim", body, &ExtractOptions::default());
        assert_eq!(record.title, "Test Claim");
        assert_eq!(record.date, "1 January 2025");
        assert_eq!(record.rating, Rating::False);
        assert_eq!(record.excerpt, "X says Y");
    }

    #[test]
    fn test_fallbacks() {
        let record = derive_record("eu-stikstof", "Alleen wat tekst.", &ExtractOptions::default());
        assert_eq!(record.title, "eu-stikstof");
        assert_eq!(record.date, helpers::today());
        assert_eq!(record.excerpt, "");
        assert_eq!(record.rating, Rating::Misleading);
        assert_eq!(record.image_url, "/images/default.svg");
        assert_eq!(record.category, Category::Europa);
    }

    #[test]
    fn test_title_quotes() {
        assert_eq!(extract_title("# “Gekrulde quotes”").as_deref(), Some("Gekrulde quotes"));
        assert_eq!(extract_title("# „Vlaamse quotes”").as_deref(), Some("Vlaamse quotes"));
        assert_eq!(extract_title("# Zonder quotes  ").as_deref(), Some("Zonder quotes"));
        assert_eq!(extract_title("## Geen titel"), None);
        assert_eq!(extract_title("# \"\""), None);
    }

    #[test]
    fn test_title_skips_fenced_code() {
        let body = "```sh\n# install\n```\n\n~~~\n# ook niet\n~~~\n# \"Echte titel\"\n";
        assert_eq!(extract_title(body).as_deref(), Some("Echte titel"));

        let stripped = strip_header(body);
        assert!(stripped.contains("# install"));
        assert!(!stripped.contains("Echte titel"));
    }

    #[test]
    fn test_rating_markers() {
        assert_eq!(extract_rating("**WAAR.** Klopt."), Rating::True);
        assert_eq!(
            extract_rating("**GEDEELTELIJK WAAR.** Deels."),
            Rating::PartlyTrue
        );
        assert_eq!(extract_rating("**NIET WAAR.** Fout."), Rating::False);
        assert_eq!(extract_rating("**PARTLY TRUE.** Some."), Rating::PartlyTrue);
        assert_eq!(extract_rating("**MISLEIDEND.** Hm."), Rating::Misleading);
        assert_eq!(extract_rating("Niet waar, zonder vet."), Rating::Misleading);
    }

    #[test]
    fn test_rating_searches_whole_document() {
        // A marker outside the conclusion still counts
        let body = "## De bewering:\nIemand zei **NIET WAAR.**\n\n## Conclusie:\n**WAAR.**";
        assert_eq!(extract_rating(body), Rating::True);
    }

    #[test]
    fn test_excerpt_until_end_of_body() {
        let body = "## De bewering:\r\nEerste regel\r\n\r\ntweede regel\n";
        assert_eq!(
            extract_excerpt(body).as_deref(),
            Some("Eerste regel tweede regel")
        );
    }

    #[test]
    fn test_excerpt_missing() {
        assert_eq!(extract_excerpt("## Onze analyse:\nTekst"), None);
        assert_eq!(extract_excerpt("## De bewering:\n\n## Onze analyse:"), None);
    }

    #[test]
    fn test_excerpt_needs_exact_claim_heading() {
        let body = "## De beweringen van de minister\nTekst\n## Conclusie:\n";
        assert_eq!(extract_excerpt(body), None);
        let body = "## The claims we checked\nTekst\n";
        assert_eq!(extract_excerpt(body), None);
        assert_eq!(
            extract_excerpt("## De bewering :\nTekst\n").as_deref(),
            Some("Tekst")
        );
    }

    #[test]
    fn test_extract_image() {
        assert_eq!(
            extract_image("Tekst ![alt](https://picsum.photos/800/400 \"titel\") meer").as_deref(),
            Some("https://picsum.photos/800/400")
        );
        assert_eq!(extract_image("![](/images/a.svg)").as_deref(), Some("/images/a.svg"));
        assert_eq!(extract_image("[link](/niet-een-beeld)"), None);
    }

    #[test]
    fn test_categorize_last_rule_wins() {
        let rules = ExtractOptions::default().category_rules;
        assert_eq!(categorize("chocolade", &rules), Category::Politiek);
        assert_eq!(categorize("europa-begroting", &rules), Category::Economie);
        assert_eq!(categorize("eu-media-wet", &rules), Category::Social);
        assert_eq!(categorize("sociaal-akkoord", &rules), Category::Social);
    }

    #[test]
    fn test_front_matter_wins() {
        let record = derive_record("begroting", BEGROTING, &ExtractOptions::default());
        let fm = FrontMatter {
            title: Some("Andere titel".to_string()),
            rating: Some("NIET WAAR".to_string()),
            category: Some("europa".to_string()),
            description: Some("Omschrijving".to_string()),
            ..Default::default()
        };
        let record = apply_front_matter(record, fm);
        assert_eq!(record.title, "Andere titel");
        assert_eq!(record.rating, Rating::False);
        assert_eq!(record.category, Category::Europa);
        assert_eq!(record.description.as_deref(), Some("Omschrijving"));
        // untouched fields keep their derived values
        assert_eq!(record.date, "20 April 2025");
        assert_eq!(record.image_url, "/images/begroting.svg");
    }

    #[test]
    fn test_reserved_front_matter_keys_are_dropped() {
        let (fm, body) =
            FrontMatter::parse("---\nslug: iets-anders\ncontent: tekst\nauteur: Redactie\n---\n# Titel\n")
                .unwrap();
        let record = derive_record("begroting", body, &ExtractOptions::default());
        let record = apply_front_matter(record, fm);
        assert!(!record.extra.contains_key("slug"));
        assert!(!record.extra.contains_key("content"));
        assert!(record.extra.contains_key("auteur"));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json.matches("\"slug\"").count(), 1);
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["slug"], "begroting");
        assert_eq!(back["auteur"], "Redactie");
    }

    #[test]
    fn test_unknown_front_matter_rating_is_ignored() {
        let record = derive_record("begroting", BEGROTING, &ExtractOptions::default());
        let fm = FrontMatter {
            rating: Some("ONDUIDELIJK".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_front_matter(record, fm).rating, Rating::True);
    }

    #[test]
    fn test_strip_header() {
        let stripped = strip_header(BEGROTING);
        assert!(!stripped.contains("# \"Vlaams"));
        assert!(!stripped.contains("Gepubliceerd op"));
        assert!(!stripped.contains("/images/begroting.svg"));
        assert!(stripped.contains("## De bewering:"));
        assert!(stripped.contains("## Bronnen:"));
    }

    #[test]
    fn test_strip_header_keeps_inline_image() {
        let body = "# Titel\n\nZie ![grafiek](/images/g.svg) hieronder.\n";
        let stripped = strip_header(body);
        assert!(stripped.contains("![grafiek](/images/g.svg)"));
    }
}
