//! Mileage, colour, engine, and body style.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::{non_empty, Rule, Source, MAX_BLOCK_LEN};
use crate::text::{clean_text, digits_only, within_len};

/// Number followed by a distance unit. `(?:^|[^\d/.,])` keeps fuel-economy
/// figures such as `8.7 L/100 km` out.
static MILEAGE_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^\d/.,])(\d{1,3}(?:,\d{3})+|\d+)\s*(?:km|kms|kilometers|kilometres|miles?)\b",
    )
    .expect("valid regex")
});

static MILEAGE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:mileage|odometer|kilometres|kilometers)\b\s*:?\s*(\d{1,3}(?:,\d{3})+|\d+)\b")
        .expect("valid regex")
});

/// End of a label's value: the next `Label:` pair or the end of the block.
/// A label is a known field noun, optionally after one word
/// (`Interior Color:`, `Fuel Type:`, `Stock #:`).
const NEXT_LABEL: &str = r"(?:\s+(?:[a-z]+\s+)?(?:colou?r|engine|transmission|drivetrain|fuel|stock|vin|body|style|type|mileage|odometer|kilometres|kilometers|doors|seats|cylinders|trim|model|year|make|condition|price|msrp|economy|interior|exterior)\s*#?\s*:|$)";

/// Compound labels may omit the colon (`<dt>Exterior Colour</dt><dd>Red</dd>`);
/// bare words need one so prose such as "available in any colour" is skipped.
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:exterior|ext\.?)\s+colou?r\b\s*:?|(?:exterior|colou?r)\s*:)\s*(?P<value>.+?){NEXT_LABEL}"
    ))
    .expect("valid regex")
});

static ENGINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bengine(?:\s+(?:type|size)\b\s*:?|\s*:)\s*(?P<value>.+?){NEXT_LABEL}"
    ))
    .expect("valid regex")
});

static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:body\s*style|body\s*type|vehicle\s*type)\b\s*:?|body\s*:)\s*(?P<value>.+?){NEXT_LABEL}"
    ))
    .expect("valid regex")
});

pub(crate) const MILEAGE_RULES: &[Rule] = &[
    Rule::new(
        Source::Attr {
            selector: "[data-mileage]",
            attr: "data-mileage",
        },
        mileage_digits,
    ),
    Rule::new(
        Source::Attr {
            selector: "[data-odometer]",
            attr: "data-odometer",
        },
        mileage_digits,
    ),
    Rule::new(Source::Selector(".mileage, .odometer"), mileage_from_text),
    Rule::new(
        Source::Keyword {
            keyword: "mileage",
            max_len: MAX_BLOCK_LEN,
        },
        mileage_from_text,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "odometer",
            max_len: MAX_BLOCK_LEN,
        },
        mileage_from_text,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "km",
            max_len: MAX_BLOCK_LEN,
        },
        mileage_with_unit,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "mile",
            max_len: MAX_BLOCK_LEN,
        },
        mileage_with_unit,
    ),
];

pub(crate) const COLOR_RULES: &[Rule] = &[
    Rule::new(
        Source::Attr {
            selector: "[data-exterior-color]",
            attr: "data-exterior-color",
        },
        short_value,
    ),
    Rule::new(Source::Selector(".exterior-color"), color_value),
    Rule::new(
        Source::Keyword {
            keyword: "exterior",
            max_len: MAX_BLOCK_LEN,
        },
        color_from_text,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "color",
            max_len: MAX_BLOCK_LEN,
        },
        color_from_text,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "colour",
            max_len: MAX_BLOCK_LEN,
        },
        color_from_text,
    ),
];

pub(crate) const ENGINE_RULES: &[Rule] = &[
    Rule::new(
        Source::Attr {
            selector: "[data-engine]",
            attr: "data-engine",
        },
        non_empty,
    ),
    Rule::new(Source::Selector(".engine"), engine_value),
    Rule::new(
        Source::Keyword {
            keyword: "engine",
            max_len: MAX_BLOCK_LEN,
        },
        engine_from_text,
    ),
];

pub(crate) const BODY_STYLE_RULES: &[Rule] = &[
    Rule::new(
        Source::Attr {
            selector: "[data-body-style]",
            attr: "data-body-style",
        },
        short_value,
    ),
    Rule::new(Source::Selector(".body-style"), body_value),
    Rule::new(
        Source::Keyword {
            keyword: "body",
            max_len: MAX_BLOCK_LEN,
        },
        body_from_text,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "type",
            max_len: MAX_BLOCK_LEN,
        },
        body_from_text,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "style",
            max_len: MAX_BLOCK_LEN,
        },
        body_from_text,
    ),
];

/// First number with a distance unit, digits only.
pub(crate) fn mileage_with_unit(text: &str) -> Option<String> {
    MILEAGE_UNIT_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| digits_only(m.as_str()))
        .find(|digits| !digits.is_empty())
}

/// Number with a unit, else a number right after a mileage label.
pub(crate) fn mileage_from_text(text: &str) -> Option<String> {
    mileage_with_unit(text).or_else(|| {
        MILEAGE_LABEL_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| digits_only(m.as_str()))
    })
}

fn mileage_digits(raw: &str) -> Option<String> {
    let whole = raw.split('.').next().unwrap_or_default();
    let digits = digits_only(whole);
    (!digits.is_empty()).then_some(digits)
}

/// Exterior colour after its label. Interior colour labels are skipped.
pub(crate) fn color_from_text(text: &str) -> Option<String> {
    labeled_values(&COLOR_RE, text)
        .into_iter()
        .filter(|(label_start, _)| {
            !text[..*label_start]
                .to_lowercase()
                .trim_end()
                .ends_with("interior")
        })
        .find_map(|(_, value)| accept(value, 2, 40))
}

pub(crate) fn engine_from_text(text: &str) -> Option<String> {
    labeled_values(&ENGINE_RE, text)
        .into_iter()
        .find_map(|(_, value)| accept(value, 2, 80))
}

pub(crate) fn body_from_text(text: &str) -> Option<String> {
    labeled_values(&BODY_RE, text)
        .into_iter()
        .find_map(|(_, value)| accept(value, 2, 30))
}

/// `(label start, value)` for every label match in `text`. The label that
/// ends one value is left unconsumed so it can start the next match.
fn labeled_values<'t>(re: &Regex, text: &'t str) -> Vec<(usize, &'t str)> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(caps) = re.captures_at(text, from) {
        let (Some(whole), Some(value)) = (caps.get(0), caps.name("value")) else {
            break;
        };
        out.push((whole.start(), value.as_str()));
        from = value.end();
    }
    out
}

/// Labeled value, or the whole text of an element dedicated to the field.
fn color_value(text: &str) -> Option<String> {
    color_from_text(text).or_else(|| accept(text, 2, 40))
}

fn engine_value(text: &str) -> Option<String> {
    engine_from_text(text).or_else(|| accept(text, 2, 80))
}

fn body_value(text: &str) -> Option<String> {
    body_from_text(text).or_else(|| accept(text, 2, 30))
}

fn short_value(raw: &str) -> Option<String> {
    accept(raw, 2, 40)
}

/// Cleans a captured value and keeps it when its length is plausible and it
/// starts like a word rather than leftover punctuation.
fn accept(raw: &str, min: usize, max: usize) -> Option<String> {
    let value = clean_text(raw.trim_matches(|c: char| c == ':' || c == '-' || c.is_whitespace()));
    let starts_alphanumeric = raw
        .trim_start()
        .chars()
        .next()
        .is_some_and(char::is_alphanumeric);
    (starts_alphanumeric && within_len(&value, min, max)).then_some(value)
}

#[cfg(test)]
#[path = "specs_test.rs"]
mod tests;
