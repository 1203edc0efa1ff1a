//! Blocks and the document that orders them.

pub mod block;
pub mod elements;
pub mod labels;
pub mod text_document;

pub use block::{BlockStats, TextBlock};
pub use elements::ElementSet;
pub use text_document::{PageCategory, TextDocument};
