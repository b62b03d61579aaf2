//! Title decomposition into year, make, model, and trim.

use std::sync::LazyLock;

use lotscan_core::{TitleParseResult, Vocabulary};
use regex::Regex;

use crate::text::{clean_text, trim_token};

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20[0-3]\d)\b").expect("valid regex"));

/// Leading listing words skipped when a title names no known brand.
const CONDITION_WORDS: [&str; 4] = ["new", "used", "pre-owned", "certified"];

/// Returns the first model year in `text` (1900-2039), if any.
#[must_use]
pub fn find_year(text: &str) -> Option<&str> {
    YEAR_RE.find(text).map(|m| m.as_str())
}

/// Splits a listing title such as `"2024 Toyota Camry XSE V6"` into its parts.
///
/// The first year is removed before the brand scan. Two-token brands
/// (`Land Rover`) win over their first token. After the brand, the first
/// trim keyword past the first token separates model from trim; without one,
/// a known two-word model is kept whole and everything after it is trim.
/// With no known brand, `make` stays empty and the split runs over the whole
/// title minus leading condition words.
#[must_use]
pub fn parse_vehicle_title(title: &str, vocab: &Vocabulary) -> TitleParseResult {
    let mut result = TitleParseResult::default();
    let cleaned = clean_text(title);

    let working = match YEAR_RE.find(&cleaned) {
        Some(m) => {
            result.year = m.as_str().to_owned();
            format!("{} {}", &cleaned[..m.start()], &cleaned[m.end()..])
        }
        None => cleaned,
    };
    let tokens: Vec<&str> = working
        .split_whitespace()
        .filter(|token| !trim_token(token).is_empty())
        .collect();

    let remainder: &[&str] = match find_brand(&tokens, vocab) {
        Some((brand, next)) => {
            result.make = brand.to_owned();
            &tokens[next..]
        }
        None => {
            let skip = tokens
                .iter()
                .take_while(|token| {
                    CONDITION_WORDS.contains(&trim_token(token).to_ascii_lowercase().as_str())
                })
                .count();
            &tokens[skip..]
        }
    };

    let (model, trim) = split_model_trim(remainder, vocab);
    result.model = model;
    result.trim = trim;
    result
}

/// Finds the first brand, preferring a two-token match at each position.
/// Returns the canonical brand and the index of the token after it.
fn find_brand<'v>(tokens: &[&str], vocab: &'v Vocabulary) -> Option<(&'v str, usize)> {
    for (i, token) in tokens.iter().enumerate() {
        if let Some(next) = tokens.get(i + 1) {
            let pair = format!("{} {}", trim_token(token), trim_token(next));
            if let Some(brand) = vocab.canonical_brand(&pair) {
                return Some((brand, i + 2));
            }
        }
        if let Some(brand) = vocab.canonical_brand(trim_token(token)) {
            return Some((brand, i + 1));
        }
    }
    None
}

fn split_model_trim(remainder: &[&str], vocab: &Vocabulary) -> (String, String) {
    if remainder.is_empty() {
        return (String::new(), String::new());
    }

    // The first token always belongs to the model, so a keyword there is not a boundary.
    let model_len = (1..remainder.len())
        .find(|&i| is_trim_at(remainder, i, vocab))
        .unwrap_or_else(|| {
            if remainder.len() >= 2 && is_multi_word_model(remainder, vocab) {
                2
            } else {
                1
            }
        });

    (
        join_tokens(&remainder[..model_len]),
        join_tokens(&remainder[model_len..]),
    )
}

fn is_multi_word_model(tokens: &[&str], vocab: &Vocabulary) -> bool {
    let pair = format!("{} {}", trim_token(tokens[0]), trim_token(tokens[1]));
    vocab.is_multi_word_model(&pair)
}

/// Single-token trim keyword at `i`, then a two-token window starting at `i`.
fn is_trim_at(tokens: &[&str], i: usize, vocab: &Vocabulary) -> bool {
    if vocab.is_trim(trim_token(tokens[i])) {
        return true;
    }
    tokens.get(i + 1).is_some_and(|next| {
        vocab.is_trim(&format!("{} {}", trim_token(tokens[i]), trim_token(next)))
    })
}

fn join_tokens(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|token| token.trim_end_matches(','))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "title_test.rs"]
mod tests;
