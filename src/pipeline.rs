//! Runs the filter stages over a document in their canonical order.
//!
//! A page first goes through the classification stage, which assigns the
//! initial `is_content` flags, then through the pipeline chosen for its page
//! category. Every stage is checked against the document invariants; a stage
//! that fails either aborts the run or is skipped, depending on
//! [`ExtractionConfig::fail_fast`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::document::{labels, PageCategory, TextDocument};
use crate::error::Result;
use crate::filters::{
    BoilerplateBlockFilter, ContentDateStringNumberFilter, ContentFusion,
    DocumentTitleMatchClassifier, Filter, IgnoreBlocksAfterContentFilter,
    IgnoreBlocksAfterContentFromEndFilter, KeepLargestBlockFilter, LabeledFieldExtractorFilter,
    ListAtEndFilter, MinClauseWordsFilter, MinWordsFilter, NumWordsRulesClassifier,
    SplitParagraphBlocksFilter, TerminatingBlocksFinder, TrailingHeadlineToBoilerplateFilter,
};
use crate::parser::html::tokenize_html;
use crate::parser::{build_document, HeuristicSniffer, PageCategorySniffer, TagActionMap, Token};

/// An ordered list of filter stages.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Filter>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn then<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.stages.push(Arc::new(filter));
        self
    }

    /// Assigns the initial classification every later stage refines.
    pub fn classification() -> Self {
        Pipeline::new()
            .then(TerminatingBlocksFinder)
            .then(DocumentTitleMatchClassifier)
            .then(NumWordsRulesClassifier)
    }

    /// The default chain, in its fixed order.
    pub fn canonical(config: &ExtractionConfig) -> Self {
        Pipeline::new()
            .then(SplitParagraphBlocksFilter::new(config.max_line_length))
            .then(IgnoreBlocksAfterContentFilter::new(
                config.ignore_after_content_min_words,
                config.full_text_min_density,
            ))
            .then(IgnoreBlocksAfterContentFromEndFilter::new(
                config.ignore_after_content_from_end_words,
            ))
            .then(ContentFusion::new(config.fusion_max_link_density))
            .then(MinClauseWordsFilter::new(
                config.min_clause_words,
                config.accept_clauses_without_delimiter,
            ))
            .then(MinWordsFilter::new(config.min_words))
            .then(KeepLargestBlockFilter::new(true, config.keep_largest_min_words))
            .then(ListAtEndFilter)
            .then(TrailingHeadlineToBoilerplateFilter)
            .then(ContentDateStringNumberFilter::new(config.date_string_threshold))
            .then(BoilerplateBlockFilter::default())
            .then(LabeledFieldExtractorFilter::new(config.field_rules.clone()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stages whose names are in `names`, in this pipeline's order.
    pub fn subset(&self, names: &[&str]) -> Self {
        self.retain(|name| names.iter().any(|n| *n == name))
    }

    /// This pipeline minus the named stages.
    pub fn without(&self, names: &[&str]) -> Self {
        self.retain(|name| !names.iter().any(|n| *n == name))
    }

    fn retain(&self, keep: impl Fn(&str) -> bool) -> Self {
        Pipeline {
            stages: self
                .stages
                .iter()
                .filter(|s| keep(s.name()))
                .cloned()
                .collect(),
        }
    }

    /// Runs every stage in order. Returns whether any stage changed the
    /// document.
    pub fn run(&self, doc: &mut TextDocument, fail_fast: bool) -> Result<bool> {
        let mut changed = false;
        for stage in &self.stages {
            let name = stage.name();
            let snapshot = (!fail_fast).then(|| doc.clone());
            let outcome = stage
                .process(doc)
                .and_then(|stage_changed| doc.validate(name).map(|_| stage_changed));

            match outcome {
                Ok(stage_changed) => {
                    debug!(
                        filter = name,
                        changed = stage_changed,
                        blocks = doc.blocks.len(),
                        "stage done"
                    );
                    changed |= stage_changed;
                }
                Err(e) => match snapshot {
                    Some(snapshot) => {
                        warn!(filter = name, error = %e, "stage failed, skipping");
                        *doc = snapshot;
                    }
                    None => return Err(e),
                },
            }
        }
        Ok(changed)
    }
}

/// Turns pages into classified documents.
///
/// Holds the tag table, category sniffer and pipelines, so it is built once
/// and shared; it is `Sync` and can serve many worker threads.
pub struct Extractor {
    config: ExtractionConfig,
    tag_actions: TagActionMap,
    sniffer: Box<dyn PageCategorySniffer>,
    classification: Pipeline,
    default_pipeline: Pipeline,
    overrides: HashMap<PageCategory, Pipeline>,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let default_pipeline = Pipeline::canonical(&config);
        // Listings have no single main block to anchor on.
        let index_pipeline =
            default_pipeline.without(&["KeepLargestBlockFilter", "ListAtEndFilter"]);

        Extractor {
            tag_actions: TagActionMap::default(),
            sniffer: Box::new(HeuristicSniffer),
            classification: Pipeline::classification(),
            default_pipeline,
            overrides: HashMap::from([(PageCategory::Index, index_pipeline)]),
            config,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn with_sniffer(mut self, sniffer: impl PageCategorySniffer + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    pub fn with_tag_actions(mut self, tag_actions: TagActionMap) -> Self {
        self.tag_actions = tag_actions;
        self
    }

    /// Uses `pipeline` for pages of `category` instead of the default.
    pub fn with_pipeline(mut self, category: PageCategory, pipeline: Pipeline) -> Self {
        self.overrides.insert(category, pipeline);
        self
    }

    /// Drops boilerplate removal from every pipeline, so results keep their
    /// non-content blocks.
    pub fn keep_boilerplate(mut self) -> Self {
        let strip = |p: &Pipeline| p.without(&["BoilerplateBlockFilter"]);
        self.default_pipeline = strip(&self.default_pipeline);
        for pipeline in self.overrides.values_mut() {
            *pipeline = strip(pipeline);
        }
        self
    }

    pub fn pipeline_for(&self, category: PageCategory) -> &Pipeline {
        self.overrides.get(&category).unwrap_or(&self.default_pipeline)
    }

    pub fn extract_html(&self, html: &str, base_url: Option<&str>) -> Result<TextDocument> {
        self.extract_tokens(tokenize_html(html), base_url)
    }

    pub fn extract_tokens<I>(&self, tokens: I, base_url: Option<&str>) -> Result<TextDocument>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut doc = build_document(
            tokens,
            base_url,
            &self.tag_actions,
            &self.config,
            self.sniffer.as_ref(),
        );
        self.process(&mut doc)?;
        Ok(doc)
    }

    /// Classifies an already built document in place.
    pub fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let overflow = if doc.blocks.len() > self.config.max_blocks {
            let tail = doc.blocks.split_off(self.config.max_blocks);
            info!(
                url = %doc.base_url,
                kept = doc.blocks.len(),
                truncated = tail.len(),
                "too many blocks, truncating"
            );
            tail
        } else {
            Vec::new()
        };

        let fail_fast = self.config.fail_fast;
        let mut changed = self.classification.run(doc, fail_fast)?;
        changed |= self.pipeline_for(doc.page_category).run(doc, fail_fast)?;

        if !overflow.is_empty() {
            doc.blocks.extend(overflow.into_iter().map(|mut b| {
                b.is_content = false;
                b.add_label(labels::TRUNCATED);
                b
            }));
            changed = true;
        }
        Ok(changed)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::filters::test_support::{block, content, doc};

    #[derive(Debug)]
    struct CorruptOffsets;

    impl Filter for CorruptOffsets {
        fn name(&self) -> &'static str {
            "CorruptOffsets"
        }

        fn process(&self, doc: &mut TextDocument) -> Result<bool> {
            for b in doc.blocks.iter_mut() {
                b.offset_blocks_start = b.offset_blocks_end + 1;
                b.is_content = false;
            }
            Ok(true)
        }
    }

    #[test]
    fn canonical_order_is_fixed() {
        let names = Pipeline::canonical(&ExtractionConfig::default()).names();
        assert_eq!(
            names,
            vec![
                "SplitParagraphBlocksFilter",
                "IgnoreBlocksAfterContentFilter",
                "IgnoreBlocksAfterContentFromEndFilter",
                "ContentFusion",
                "MinClauseWordsFilter",
                "MinWordsFilter",
                "KeepLargestBlockFilter",
                "ListAtEndFilter",
                "TrailingHeadlineToBoilerplateFilter",
                "ContentDateStringNumberFilter",
                "BoilerplateBlockFilter",
                "LabeledFieldExtractorFilter",
            ]
        );
    }

    #[test]
    fn subset_keeps_pipeline_order() {
        let pipeline = Pipeline::canonical(&ExtractionConfig::default())
            .subset(&["BoilerplateBlockFilter", "ContentFusion", "NoSuchFilter"]);
        assert_eq!(pipeline.names(), vec!["ContentFusion", "BoilerplateBlockFilter"]);
    }

    #[test]
    fn index_pages_get_their_own_pipeline() {
        let extractor = Extractor::default();
        let index = extractor.pipeline_for(PageCategory::Index).names();
        assert!(!index.contains(&"KeepLargestBlockFilter"));
        assert!(index.contains(&"ContentFusion"));
        assert_eq!(
            extractor.pipeline_for(PageCategory::Detail).len(),
            Pipeline::canonical(extractor.config()).len()
        );
    }

    #[test]
    fn failing_stage_is_skipped_when_not_fail_fast() {
        let pipeline = Pipeline::new().then(CorruptOffsets).then(MinWordsFilter::new(5));
        let mut d = doc(vec![content("a b c d", 4, 0), content("long enough here", 8, 1)]);

        let changed = pipeline.run(&mut d, false).unwrap();
        assert!(changed);
        assert_eq!(d.blocks[0].offset_blocks_start, 0);
        assert!(!d.blocks[0].is_content);
        assert!(d.blocks[1].is_content);
    }

    #[test]
    fn failing_stage_aborts_when_fail_fast() {
        let pipeline = Pipeline::new().then(CorruptOffsets);
        let mut d = doc(vec![content("a", 1, 0)]);
        let err = pipeline.run(&mut d, true).unwrap_err();
        assert!(matches!(err, EngineError::Invariant { ref stage, .. } if stage == "CorruptOffsets"));
        // No rollback: the document is left as the stage wrote it.
        assert!(!d.blocks[0].is_content);
    }

    #[test]
    fn empty_and_single_block_documents_survive_every_stage() {
        let extractor = Extractor::default();
        let mut empty = doc(vec![]);
        extractor.process(&mut empty).unwrap();
        assert!(empty.blocks.is_empty());

        // A lone three-word block never reads as content, so nothing is left.
        let mut single = doc(vec![block("One short line", 3, 0, 0)]);
        extractor.process(&mut single).unwrap();
        assert!(single.blocks.is_empty());
    }

    #[test]
    fn blocks_past_the_guard_are_truncated() {
        let config = ExtractionConfig {
            max_blocks: 2,
            ..ExtractionConfig::default()
        };
        let sentence = "This block holds a complete sentence of prose.";
        let mut d = doc(vec![
            block(sentence, 30, 0, 0),
            block(sentence, 30, 0, 1),
            block(sentence, 30, 0, 2),
            block(sentence, 30, 0, 3),
        ]);

        Extractor::new(config).process(&mut d).unwrap();
        assert_eq!(d.blocks.len(), 3);
        assert!(d.blocks[0].is_content);
        assert_eq!(d.blocks[0].num_words(), 60);
        for b in &d.blocks[1..] {
            assert!(!b.is_content);
            assert!(b.has_label(labels::TRUNCATED));
        }
    }

    #[test]
    fn extracts_article_from_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/article.html").unwrap();
        let doc = Extractor::default()
            .extract_html(&html, Some("https://news.example.com/2024/05/rust-builds"))
            .unwrap();

        let text = doc.content();
        assert!(text.starts_with("The new release focuses"));
        assert!(text.contains("incremental compilation"));
        assert!(text.contains("continuous integration jobs"));
        assert!(!text.contains("Jane Doe"));
        assert!(!text.contains("About us"));
        assert!(!text.contains("Post a comment"));
        assert!(!text.contains("All rights reserved"));
        assert_eq!(
            doc.content_title.as_deref(),
            Some("Rust 2.0 released with faster builds")
        );
        assert_eq!(
            doc.page_title.as_deref(),
            Some("Rust 2.0 released with faster builds | Daily Systems")
        );
    }
}
