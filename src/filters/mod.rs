//! Block filters.
//!
//! Each filter reads and mutates one document's blocks in place and reports
//! whether it changed anything. Filters hold only their thresholds, so one
//! instance can serve any number of documents.

pub mod boilerplate;
pub mod classifiers;
pub mod date_strings;
pub mod debug;
pub mod fields;
pub mod fusion;
pub mod headline;
pub mod ignore_after;
pub mod largest;
pub mod list_at_end;
pub mod min_words;
pub mod split;

use std::fmt;

pub use boilerplate::{BoilerplateBlockFilter, InvertedFilter};
pub use classifiers::{DocumentTitleMatchClassifier, NumWordsRulesClassifier, TerminatingBlocksFinder};
pub use date_strings::ContentDateStringNumberFilter;
pub use debug::PrintDebugFilter;
pub use fields::LabeledFieldExtractorFilter;
pub use fusion::ContentFusion;
pub use headline::TrailingHeadlineToBoilerplateFilter;
pub use ignore_after::{IgnoreBlocksAfterContentFilter, IgnoreBlocksAfterContentFromEndFilter};
pub use largest::KeepLargestBlockFilter;
pub use list_at_end::ListAtEndFilter;
pub use min_words::{MinClauseWordsFilter, MinWordsFilter};
pub use split::SplitParagraphBlocksFilter;

use crate::document::TextDocument;
use crate::error::Result;

pub trait Filter: fmt::Debug + Send + Sync {
    /// Stage name used in pipelines and logs.
    fn name(&self) -> &'static str;

    /// Returns `Ok(true)` if the document changed.
    fn process(&self, doc: &mut TextDocument) -> Result<bool>;
}
