//! Markdown rendering with a component style map
//!
//! Article bodies are MDX. Top-level `import`/`export` lines are dropped and
//! the rest is rendered as CommonMark. Elements named in the style map get a
//! `class` attribute, e.g. `h2 -> "text-xl font-semibold my-3"`.

use indexmap::IndexMap;
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::helpers::html_escape;

/// Markdown renderer
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    styles: IndexMap<String, String>,
}

/// Image collected while its alt text is being read
struct PendingImage {
    src: String,
    title: String,
    alt: String,
}

impl MarkdownRenderer {
    /// Create a renderer without styles
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with an element -> class map
    pub fn with_styles(styles: IndexMap<String, String>) -> Self {
        Self { styles }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let source = strip_esm(markdown);
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(&source, options);

        let mut events: Vec<Event> = Vec::new();
        let mut image: Option<PendingImage> = None;

        for event in parser {
            if image.is_some() {
                match event {
                    Event::End(TagEnd::Image) => {
                        if let Some(img) = image.take() {
                            events.push(self.image_html(&img));
                        }
                    }
                    Event::Text(text) | Event::Code(text) => {
                        if let Some(img) = image.as_mut() {
                            img.alt.push_str(&text);
                        }
                    }
                    _ => {}
                }
                continue;
            }

            let styled = match &event {
                Event::Start(Tag::Heading { level, .. }) => self.open(heading_tag(*level), ""),
                Event::End(TagEnd::Heading(level)) => self.close(heading_tag(*level), "\n"),
                Event::Start(Tag::Paragraph) => self.open("p", ""),
                Event::End(TagEnd::Paragraph) => self.close("p", "\n"),
                Event::Start(Tag::List(Some(start))) => {
                    let attrs = if *start == 1 {
                        String::new()
                    } else {
                        format!(r#" start="{}""#, start)
                    };
                    self.open("ol", &attrs).map(|e| append(e, "\n"))
                }
                Event::Start(Tag::BlockQuote(_)) => {
                    self.open("blockquote", "").map(|e| append(e, "\n"))
                }
                Event::End(TagEnd::BlockQuote(_)) => self.close("blockquote", "\n"),
                Event::Start(Tag::List(None)) => self.open("ul", "").map(|e| append(e, "\n")),
                Event::End(TagEnd::List(true)) => self.close("ol", "\n"),
                Event::End(TagEnd::List(false)) => self.close("ul", "\n"),
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) => {
                    let href = if *link_type == LinkType::Email {
                        format!("mailto:{}", dest_url)
                    } else {
                        dest_url.to_string()
                    };
                    let mut attrs = format!(r#" href="{}""#, html_escape(&href));
                    if !title.is_empty() {
                        attrs.push_str(&format!(r#" title="{}""#, html_escape(title)));
                    }
                    self.open("a", &attrs)
                }
                Event::End(TagEnd::Link) => self.close("a", ""),
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) if self.styles.contains_key("img") => {
                    image = Some(PendingImage {
                        src: dest_url.to_string(),
                        title: title.to_string(),
                        alt: String::new(),
                    });
                    continue;
                }
                _ => None,
            };

            events.push(styled.unwrap_or(event));
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Opening tag with the configured class, if the element is styled
    fn open(&self, tag: &str, attrs: &str) -> Option<Event<'static>> {
        let class = self.styles.get(tag)?;
        Some(Event::Html(CowStr::from(format!(
            r#"<{}{} class="{}">"#,
            tag,
            attrs,
            html_escape(class)
        ))))
    }

    fn close(&self, tag: &str, suffix: &str) -> Option<Event<'static>> {
        self.styles.get(tag)?;
        Some(Event::Html(CowStr::from(format!("</{}>{}", tag, suffix))))
    }

    fn image_html(&self, img: &PendingImage) -> Event<'static> {
        let mut html = format!(
            r#"<img src="{}" alt="{}""#,
            html_escape(&img.src),
            html_escape(&img.alt)
        );
        if !img.title.is_empty() {
            html.push_str(&format!(r#" title="{}""#, html_escape(&img.title)));
        }
        if let Some(class) = self.styles.get("img") {
            html.push_str(&format!(r#" class="{}""#, html_escape(class)));
        }
        html.push_str(" />");
        Event::Html(CowStr::from(html))
    }
}

fn append(event: Event<'static>, suffix: &str) -> Event<'static> {
    match event {
        Event::Html(html) => Event::Html(CowStr::from(format!("{}{}", html, suffix))),
        other => other,
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Drop MDX module lines (`import ...`, `export ...`) outside code fences
fn strip_esm(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut fence: Option<&str> = None;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None => {
                if trimmed.starts_with("```") {
                    fence = Some("```");
                } else if trimmed.starts_with("~~~") {
                    fence = Some("~~~");
                } else if line.starts_with("import ") || line.starts_with("export ") {
                    continue;
                }
            }
        }
        out.push_str(line);
    }
    out
}
