pub mod builder;
pub mod category;
pub mod dates;
pub mod html;
pub mod tag_actions;
pub mod token;
pub mod words;

pub use builder::{build_document, BlockBuilder};
pub use category::{HeuristicSniffer, PageCategorySniffer};
pub use tag_actions::{TagAction, TagActionMap};
pub use token::Token;

use crate::config::ExtractionConfig;
use crate::document::TextDocument;

/// HTML string → token stream → blocks, with the default tag table.
pub fn parse_html(html: &str, base_url: Option<&str>, config: &ExtractionConfig) -> TextDocument {
    let tokens = html::tokenize_html(html);
    build_document(
        tokens,
        base_url,
        &TagActionMap::default(),
        config,
        &HeuristicSniffer,
    )
}
