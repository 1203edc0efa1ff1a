use super::Filter;
use crate::config::FieldRule;
use crate::document::TextDocument;
use crate::error::Result;

/// Copies the text of labeled content blocks into named document fields.
///
/// When several blocks match a rule the last one wins.
#[derive(Debug, Clone, Default)]
pub struct LabeledFieldExtractorFilter {
    pub rules: Vec<FieldRule>,
}

impl LabeledFieldExtractorFilter {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }
}

impl Filter for LabeledFieldExtractorFilter {
    fn name(&self) -> &'static str {
        "LabeledFieldExtractorFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        let mut changed = false;
        for rule in &self.rules {
            let value = doc
                .blocks
                .iter()
                .rev()
                .find(|b| b.is_content && b.has_label(&rule.label))
                .map(|b| b.text.clone());
            if let Some(value) = value {
                let previous = doc.fields.insert(rule.field.clone(), value.clone());
                changed |= previous.as_deref() != Some(value.as_str());
            }
        }
        Ok(changed)
    }
}
