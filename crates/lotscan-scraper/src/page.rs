//! Parsed HTML document and the text views the extractors read.
//!
//! `scraper::Html` is not `Send`, so a `ParsedPage` is built and consumed
//! synchronously between fetches and never held across an `.await`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::text::clean_text;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static BODY_ELEMENTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body *").expect("valid selector"));
static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static JSON_LD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector")
});

/// Elements whose text is never rendered.
const HIDDEN_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "svg"];

/// Site chrome repeated on every page of a dealer site.
const CHROME_TAGS: [&str; 3] = ["nav", "header", "footer"];

/// A short run of visible text and the visible text of its previous sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    pub preceding: String,
}

pub struct ParsedPage {
    url: String,
    document: Html,
}

impl ParsedPage {
    #[must_use]
    pub fn parse(url: &str, html: &str) -> Self {
        Self {
            url: url.to_owned(),
            document: Html::parse_document(html),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Elements matching `css` in document order. An invalid selector
    /// matches nothing.
    #[must_use]
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(e) => {
                tracing::debug!(selector = css, error = ?e, "skipping invalid selector");
                Vec::new()
            }
        }
    }

    /// Visible text of the first element matching `css` that has any.
    #[must_use]
    pub fn first_text(&self, css: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .filter(|el| !is_hidden(*el))
            .map(visible_text)
            .find(|text| !text.is_empty())
    }

    /// First non-empty `attr` value among elements matching `css`.
    #[must_use]
    pub fn first_attr(&self, css: &str, attr: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .filter_map(|el| el.value().attr(attr))
            .map(clean_text)
            .find(|value| !value.is_empty())
    }

    /// Raw `href` values of every anchor, in document order.
    pub fn hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(&ANCHORS)
            .filter_map(|anchor| anchor.value().attr("href"))
    }

    #[must_use]
    pub fn images(&self) -> Vec<ElementRef<'_>> {
        self.document.select(&IMAGES).collect()
    }

    /// Bodies of all `application/ld+json` scripts.
    #[must_use]
    pub fn json_ld_blocks(&self) -> Vec<String> {
        self.document
            .select(&JSON_LD)
            .map(|script| script.text().collect::<String>().trim().to_owned())
            .filter(|body| !body.is_empty())
            .collect()
    }

    /// All visible body text, whitespace-normalized.
    #[must_use]
    pub fn page_text(&self) -> String {
        self.document
            .select(&BODY)
            .next()
            .map(visible_text)
            .unwrap_or_default()
    }

    /// Visible body text without `nav`, `header`, and `footer` content, for
    /// page-wide phrase checks that site menus would otherwise satisfy.
    #[must_use]
    pub fn content_text(&self) -> String {
        let Some(body) = self.document.select(&BODY).next() else {
            return String::new();
        };
        let mut raw = String::new();
        push_text(body, &[&HIDDEN_TAGS[..], &CHROME_TAGS[..]].concat(), &mut raw);
        clean_text(&raw)
    }

    /// Visible text of every body element whose text is non-empty and at most
    /// `max_len` characters, in document order. Nested elements each yield
    /// their own block.
    #[must_use]
    pub fn text_blocks(&self, max_len: usize) -> Vec<String> {
        self.document
            .select(&BODY_ELEMENTS)
            .filter(|el| !is_hidden(*el))
            .map(visible_text)
            .filter(|text| !text.is_empty() && text.chars().count() <= max_len)
            .collect()
    }

    /// The outermost elements (or bare text runs) whose visible text fits in
    /// `max_len` characters, in document order. Unlike [`Self::text_blocks`]
    /// no text appears in two blocks.
    #[must_use]
    pub fn maximal_blocks(&self, max_len: usize) -> Vec<TextBlock> {
        let mut blocks = Vec::new();
        if let Some(body) = self.document.select(&BODY).next() {
            collect_maximal(body, max_len, &mut blocks);
        }
        blocks
    }
}

/// Whitespace-normalized text of `el`, skipping script/style content.
/// Element boundaries count as word breaks.
#[must_use]
pub fn visible_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(el, &HIDDEN_TAGS, &mut raw);
    clean_text(&raw)
}

fn push_text(el: ElementRef<'_>, skip: &[&str], out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if !skip.contains(&element.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    out.push(' ');
                    push_text(child_el, skip, out);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Whether `el` sits inside a `nav`, `header`, or `footer`.
pub(crate) fn in_site_chrome(el: ElementRef<'_>) -> bool {
    el.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|element| CHROME_TAGS.contains(&element.name()))
    })
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    HIDDEN_TAGS.contains(&el.value().name())
        || el.ancestors().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|element| HIDDEN_TAGS.contains(&element.name()))
        })
}

fn collect_maximal(el: ElementRef<'_>, max_len: usize, out: &mut Vec<TextBlock>) {
    let mut preceding = String::new();
    for child in el.children() {
        let text = match child.value() {
            Node::Text(raw) => clean_text(raw),
            Node::Element(element) if !HIDDEN_TAGS.contains(&element.name()) => {
                match ElementRef::wrap(child) {
                    Some(child_el) => {
                        let text = visible_text(child_el);
                        if text.chars().count() > max_len {
                            collect_maximal(child_el, max_len, out);
                            preceding.clear();
                            continue;
                        }
                        text
                    }
                    None => continue,
                }
            }
            _ => continue,
        };
        if text.is_empty() {
            continue;
        }
        if text.chars().count() <= max_len {
            out.push(TextBlock {
                text: text.clone(),
                preceding: std::mem::take(&mut preceding),
            });
            preceding = text;
        } else {
            preceding.clear();
        }
    }
}
