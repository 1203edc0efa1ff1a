use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::block::TextBlock;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageCategory {
    /// Listing or navigation page: many links, little prose.
    Index,
    /// A single article or item page.
    Detail,
    #[default]
    Unknown,
}

impl PageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageCategory::Index => "index",
            PageCategory::Detail => "detail",
            PageCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered blocks of one page plus page-level metadata.
///
/// Block order is document order; filters rely on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextDocument {
    pub blocks: Vec<TextBlock>,
    pub base_url: String,
    pub page_title: Option<String>,
    pub content_title: Option<String>,
    pub publish_time: Option<NaiveDateTime>,
    pub modified_time: Option<NaiveDateTime>,
    pub date_time_count: usize,
    pub page_category: PageCategory,
    pub fields: BTreeMap<String, String>,
    /// Characters and anchors seen while building, used for category sniffing.
    pub char_count: usize,
    pub anchor_count: usize,
}

impl TextDocument {
    pub fn new(base_url: String, page_title: Option<String>, blocks: Vec<TextBlock>) -> Self {
        TextDocument {
            blocks,
            base_url,
            page_title,
            ..Default::default()
        }
    }

    /// Newline-joined text of the selected blocks, in document order.
    pub fn text_content(&self, include_content: bool, include_non_content: bool) -> String {
        self.selected(include_content, include_non_content)
            .map(|b| b.text.as_str())
            .join("\n")
    }

    /// Paragraph-wrapped HTML fragment of the selected blocks.
    pub fn html_content(&self, include_content: bool, include_non_content: bool) -> String {
        self.selected(include_content, include_non_content)
            .map(|b| b.rich_text.as_str())
            .join("\n")
    }

    /// Shorthand for the content-only text.
    pub fn content(&self) -> String {
        self.text_content(true, false)
    }

    pub fn content_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(|b| b.is_content)
    }

    fn selected(
        &self,
        include_content: bool,
        include_non_content: bool,
    ) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(move |b| {
            if b.is_content {
                include_content
            } else {
                include_non_content
            }
        })
    }

    /// Checks the per-block invariants every stage must preserve.
    pub fn validate(&self, stage: &str) -> Result<()> {
        for (i, b) in self.blocks.iter().enumerate() {
            if b.offset_blocks_start > b.offset_blocks_end {
                return Err(EngineError::invariant(
                    stage,
                    format!(
                        "block {} has offset range {}..{}",
                        i, b.offset_blocks_start, b.offset_blocks_end
                    ),
                ));
            }
            if b.stats.num_wrapped_lines == 0 {
                return Err(EngineError::invariant(
                    stage,
                    format!("block {} has zero wrapped lines", i),
                ));
            }
            if b.stats.num_words_in_anchor_text > b.stats.num_words {
                return Err(EngineError::invariant(
                    stage,
                    format!(
                        "block {} has {} anchor words but only {} words",
                        i, b.stats.num_words_in_anchor_text, b.stats.num_words
                    ),
                ));
            }
        }
        Ok(())
    }

    /// One line per block with its features, for diagnostics.
    pub fn debug_string(&self) -> String {
        self.blocks.iter().enumerate().map(|(i, b)| describe(i, b)).join("\n")
    }
}

pub(crate) fn describe(i: usize, b: &TextBlock) -> String {
    format!(
        "[{}-{};tl={};nw={};ld={:.3};td={:.3}] {} {} {:?}",
        b.offset_blocks_start,
        b.offset_blocks_end,
        b.tag_level,
        b.num_words(),
        b.link_density(),
        b.text_density(),
        if b.is_content { "CONTENT" } else { "boilerplate" },
        i,
        b.labels,
    ) + "\n" + &b.text
}
