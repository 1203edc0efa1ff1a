//! Boilerplate removal for crawled HTML pages.
//!
//! A page is reduced to a sequence of text blocks, each block is classified
//! as content or boilerplate by a fixed chain of filters, and the result is a
//! [`TextDocument`] that exposes the main text, page metadata and extracted
//! fields.
//!
//! ```no_run
//! use crawl_boilerpipe::{ExtractionConfig, Extractor};
//!
//! let extractor = Extractor::new(ExtractionConfig::default());
//! let doc = extractor
//!     .extract_html("<html><body><p>Hello</p></body></html>", Some("https://example.com/a"))
//!     .unwrap();
//! println!("{}", doc.content());
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod filters;
pub mod parser;
pub mod pipeline;

pub use config::{ExtractionConfig, FieldRule};
pub use document::{labels, PageCategory, TextBlock, TextDocument};
pub use error::{EngineError, Result};
pub use filters::Filter;
pub use pipeline::{Extractor, Pipeline};
