//! Tunable thresholds for the block builder and the filter pipeline.
//!
//! Every number a filter compares against lives here so a pipeline can be
//! retuned per page category without touching filter code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const ENV_PREFIX: &str = "BOILERPIPE";

/// Maps blocks carrying `label` onto `document.fields[field]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub label: String,
    pub field: String,
}

impl FieldRule {
    pub fn new(label: &str, field: &str) -> Self {
        FieldRule {
            label: label.to_string(),
            field: field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// `MinWordsFilter`: content blocks with fewer words are demoted.
    pub min_words: usize,
    /// `MinClauseWordsFilter`: tokens a clause needs to count as prose.
    pub min_clause_words: usize,
    pub accept_clauses_without_delimiter: bool,
    /// `ContentFusion` merges a block only below this link density.
    pub fusion_max_link_density: f64,
    /// Visual line width used to estimate wrapped lines.
    pub max_line_length: usize,
    /// `IgnoreBlocksAfterContentFilter` word threshold.
    pub ignore_after_content_min_words: usize,
    /// `IgnoreBlocksAfterContentFromEndFilter` stops after this many words.
    pub ignore_after_content_from_end_words: usize,
    /// Blocks below this text density contribute no full-text words.
    pub full_text_min_density: f64,
    /// `ContentDateStringNumberFilter` fires at this many date strings.
    pub date_string_threshold: usize,
    /// `KeepLargestBlockFilter` same-level expansion threshold.
    pub keep_largest_min_words: usize,
    /// Blocks past this index are not filtered, only marked boilerplate.
    pub max_blocks: usize,
    /// A single block's buffered text stops growing past this many chars.
    pub max_block_chars: usize,
    pub field_rules: Vec<FieldRule>,
    /// Abort on a failing stage instead of skipping it.
    pub fail_fast: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            min_words: 5,
            min_clause_words: 5,
            accept_clauses_without_delimiter: false,
            fusion_max_link_density: 0.56,
            max_line_length: 80,
            ignore_after_content_min_words: 60,
            ignore_after_content_from_end_words: 200,
            full_text_min_density: 9.0,
            date_string_threshold: 8,
            keep_largest_min_words: 150,
            max_blocks: 5000,
            max_block_chars: 100_000,
            field_rules: Vec::new(),
            fail_fast: cfg!(debug_assertions),
        }
    }
}

impl ExtractionConfig {
    /// Defaults, overlaid by an optional file, overlaid by `BOILERPIPE__*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&ExtractionConfig::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let c = ExtractionConfig::default();
        assert_eq!(c.min_clause_words, 5);
        assert_eq!(c.max_line_length, 80);
        assert_eq!(c.ignore_after_content_min_words, 60);
        assert_eq!(c.ignore_after_content_from_end_words, 200);
        assert_eq!(c.date_string_threshold, 8);
        assert!((c.fusion_max_link_density - 0.56).abs() < f64::EPSILON);
        assert!(c.field_rules.is_empty());
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let c = ExtractionConfig::load(None).unwrap();
        assert_eq!(c.min_words, ExtractionConfig::default().min_words);
        assert_eq!(c.max_blocks, 5000);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c: ExtractionConfig = serde_json::from_str(r#"{"min_words": 12}"#).unwrap();
        assert_eq!(c.min_words, 12);
        assert_eq!(c.max_line_length, 80);
    }
}
