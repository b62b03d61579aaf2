//! Declarative per-field cascades.
//!
//! Each field is an ordered `&[Rule]`: a place to look for candidate text and
//! a function that turns one candidate into a value. The first rule whose
//! extractor returns `Some` for any of its candidates decides the field.

use crate::page::ParsedPage;

/// Upper bound on the text blocks scanned by keyword rules.
pub(crate) const MAX_BLOCK_LEN: usize = 200;

/// Where a rule finds its candidate strings.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source {
    /// The attribute value of each element matching the selector.
    Attr {
        selector: &'static str,
        attr: &'static str,
    },
    /// The visible text of each element matching the selector.
    Selector(&'static str),
    /// Text blocks of at most `max_len` chars containing `keyword`, any case.
    Keyword {
        keyword: &'static str,
        max_len: usize,
    },
    /// The whole visible page text as one candidate.
    PageText,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub source: Source,
    pub extract: fn(&str) -> Option<String>,
}

impl Rule {
    pub(crate) const fn new(source: Source, extract: fn(&str) -> Option<String>) -> Self {
        Self { source, extract }
    }
}

/// A page plus the text views that several rules share, computed once.
pub(crate) struct PageView<'p> {
    pub page: &'p ParsedPage,
    blocks: Vec<String>,
    page_text: String,
}

impl<'p> PageView<'p> {
    pub(crate) fn new(page: &'p ParsedPage) -> Self {
        Self {
            page,
            blocks: page.text_blocks(MAX_BLOCK_LEN),
            page_text: page.page_text(),
        }
    }

    fn candidates(&self, source: Source) -> Vec<String> {
        match source {
            Source::Attr { selector, attr } => self
                .page
                .select(selector)
                .into_iter()
                .filter_map(|el| el.value().attr(attr))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .collect(),
            Source::Selector(selector) => self
                .page
                .select(selector)
                .into_iter()
                .map(crate::page::visible_text)
                .filter(|text| !text.is_empty())
                .collect(),
            Source::Keyword { keyword, max_len } => self
                .blocks
                .iter()
                .filter(|block| {
                    block.chars().count() <= max_len
                        && block.to_lowercase().contains(keyword)
                })
                .cloned()
                .collect(),
            Source::PageText => vec![self.page_text.clone()],
        }
    }
}

/// Runs `rules` in order and returns the first extracted value.
pub(crate) fn first_match(view: &PageView<'_>, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|rule| {
        view.candidates(rule.source)
            .iter()
            .find_map(|candidate| (rule.extract)(candidate))
    })
}

/// Extractor that accepts any non-empty text as-is.
pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = crate::text::clean_text(text);
    (!text.is_empty()).then_some(text)
}
