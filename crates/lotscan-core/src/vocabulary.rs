//! Brand, trim, model, and body-style vocabularies.
//!
//! The word lists live in YAML so they can be extended without touching the
//! extraction code. [`Vocabulary::builtin`] uses the copy embedded from
//! `config/vocabulary.yaml`; [`load_vocabulary`] reads an override from disk.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

const BUILTIN_VOCABULARY: &str = include_str!("../../../config/vocabulary.yaml");

/// Raw on-disk shape of the vocabulary file.
#[derive(Debug, Deserialize)]
struct VocabularyFile {
    brands: Vec<String>,
    #[serde(default)]
    brand_aliases: HashMap<String, String>,
    trims: Vec<String>,
    #[serde(default)]
    multi_word_models: Vec<String>,
    #[serde(default)]
    body_styles: Vec<BodyStyleGroup>,
}

/// Model names that imply a body style, e.g. `Truck: [Tacoma, Tundra]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyStyleGroup {
    pub label: String,
    pub models: Vec<String>,
}

/// Case-insensitive lookup sets built from a [`VocabularyFile`].
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// lowercase spelling (brand or alias) -> canonical brand
    brands: HashMap<String, String>,
    trims: HashSet<String>,
    multi_word_models: HashSet<String>,
    /// groups in priority order, model names lowercased
    body_styles: Vec<BodyStyleGroup>,
}

impl Vocabulary {
    /// Returns the vocabulary embedded at build time.
    ///
    /// # Panics
    ///
    /// Panics if the embedded YAML is invalid, which the unit tests rule out.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_yaml_str(BUILTIN_VOCABULARY).expect("embedded vocabulary is valid")
    }

    /// Parses and validates a vocabulary from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::VocabularyFileParse`] for malformed YAML and
    /// [`ConfigError::Validation`] for empty or duplicated entries.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: VocabularyFile = serde_yaml::from_str(content)?;
        validate_vocabulary(&file)?;

        let mut brands: HashMap<String, String> = file
            .brands
            .iter()
            .map(|b| (b.to_lowercase(), b.clone()))
            .collect();
        for (alias, canonical) in &file.brand_aliases {
            brands.insert(alias.to_lowercase(), canonical.clone());
        }

        let body_styles = file
            .body_styles
            .into_iter()
            .map(|group| BodyStyleGroup {
                label: group.label,
                models: group.models.iter().map(|m| m.to_lowercase()).collect(),
            })
            .collect();

        Ok(Self {
            brands,
            trims: file.trims.iter().map(|t| t.to_lowercase()).collect(),
            multi_word_models: file
                .multi_word_models
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            body_styles,
        })
    }

    /// Returns the canonical brand name for a title phrase (one token or two
    /// space-joined tokens), resolving aliases such as `Chevy`.
    #[must_use]
    pub fn canonical_brand(&self, phrase: &str) -> Option<&str> {
        self.brands.get(&phrase.to_lowercase()).map(String::as_str)
    }

    /// Returns `true` if `phrase` is a known trim or edition keyword.
    #[must_use]
    pub fn is_trim(&self, phrase: &str) -> bool {
        self.trims.contains(&phrase.to_lowercase())
    }

    /// Returns `true` if `phrase` is a known model name spanning two tokens.
    #[must_use]
    pub fn is_multi_word_model(&self, phrase: &str) -> bool {
        self.multi_word_models.contains(&phrase.to_lowercase())
    }

    /// Classifies a model string by the first body-style group with a model
    /// name appearing in it as whole words.
    #[must_use]
    pub fn body_style_for_model(&self, model: &str) -> Option<&str> {
        if model.trim().is_empty() {
            return None;
        }
        let padded = format!(" {} ", model.to_lowercase());
        self.body_styles
            .iter()
            .find(|group| {
                group
                    .models
                    .iter()
                    .any(|name| padded.contains(&format!(" {name} ")))
            })
            .map(|group| group.label.as_str())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Loads and validates a vocabulary override from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VocabularyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    Vocabulary::from_yaml_str(&content)
}

fn validate_vocabulary(file: &VocabularyFile) -> Result<(), ConfigError> {
    if file.brands.is_empty() {
        return Err(ConfigError::Validation(
            "vocabulary must list at least one brand".to_string(),
        ));
    }
    if file.trims.is_empty() {
        return Err(ConfigError::Validation(
            "vocabulary must list at least one trim keyword".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for brand in &file.brands {
        if brand.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }
        if brand.split_whitespace().count() > 2 {
            return Err(ConfigError::Validation(format!(
                "brand '{brand}' has more than two words"
            )));
        }
        if !seen.insert(brand.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand: '{brand}'"
            )));
        }
    }

    for (alias, canonical) in &file.brand_aliases {
        if !seen.contains(&canonical.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "alias '{alias}' points at unknown brand '{canonical}'"
            )));
        }
    }

    for model in &file.multi_word_models {
        if model.split_whitespace().count() != 2 {
            return Err(ConfigError::Validation(format!(
                "multi-word model '{model}' must have exactly two words"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "vocabulary_test.rs"]
mod tests;
