use std::collections::HashMap;

use crate::document::labels;

/// What a tag does to block building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    /// Text inside never contributes (scripts, styles, embedded objects).
    Ignorable,
    /// Inline formatting that does not separate words.
    InlineNoWhitespace,
    /// Inline element that forces a word boundary.
    InlineWhitespace,
    /// Enclosed words count as anchor text.
    AnchorText,
    /// Start of countable content; text before it is only a title candidate.
    Body,
    /// `<font size=..>`; blocks get a `font-N` label.
    Font,
    /// Block-level tag attaching labels to the blocks it contains.
    LabeledBlock(&'static [&'static str]),
}

impl TagAction {
    pub fn changes_tag_level(&self) -> bool {
        match self {
            TagAction::Ignorable
            | TagAction::AnchorText
            | TagAction::Body
            | TagAction::LabeledBlock(_) => true,
            TagAction::InlineNoWhitespace | TagAction::InlineWhitespace | TagAction::Font => false,
        }
    }

    /// Whether the pending block must be flushed when the tag opens or closes.
    pub fn forces_flush(&self) -> bool {
        matches!(
            self,
            TagAction::Ignorable | TagAction::Body | TagAction::LabeledBlock(_)
        )
    }
}

const LI_LABELS: &[&str] = &[labels::LI];
const H1_LABELS: &[&str] = &[labels::H1, labels::HEADING];
const H2_LABELS: &[&str] = &[labels::H2, labels::HEADING];
const H3_LABELS: &[&str] = &[labels::H3, labels::HEADING];

/// Tag name (lowercase) to action. Tags missing from the map change the tag
/// level and force a flush.
#[derive(Debug, Clone)]
pub struct TagActionMap {
    actions: HashMap<String, TagAction>,
}

impl TagActionMap {
    pub fn empty() -> Self {
        TagActionMap {
            actions: HashMap::new(),
        }
    }

    pub fn set(&mut self, tag: &str, action: TagAction) -> &mut Self {
        self.actions.insert(tag.to_ascii_lowercase(), action);
        self
    }

    pub fn get(&self, tag: &str) -> Option<TagAction> {
        if let Some(action) = self.actions.get(tag) {
            return Some(*action);
        }
        self.actions.get(&tag.to_ascii_lowercase()).copied()
    }
}

impl Default for TagActionMap {
    fn default() -> Self {
        let mut map = TagActionMap::empty();
        for tag in ["style", "script", "option", "object", "embed", "applet", "link", "noscript"] {
            map.set(tag, TagAction::Ignorable);
        }
        for tag in [
            "strike", "u", "b", "i", "em", "strong", "span", "sup", "code", "tt", "sub", "var",
        ] {
            map.set(tag, TagAction::InlineNoWhitespace);
        }
        for tag in ["abbr", "acronym"] {
            map.set(tag, TagAction::InlineWhitespace);
        }
        map.set("a", TagAction::AnchorText)
            .set("body", TagAction::Body)
            .set("font", TagAction::Font)
            .set("li", TagAction::LabeledBlock(LI_LABELS))
            .set("h1", TagAction::LabeledBlock(H1_LABELS))
            .set("h2", TagAction::LabeledBlock(H2_LABELS))
            .set("h3", TagAction::LabeledBlock(H3_LABELS));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let map = TagActionMap::default();
        assert_eq!(map.get("SCRIPT"), Some(TagAction::Ignorable));
        assert_eq!(map.get("a"), Some(TagAction::AnchorText));
        assert_eq!(map.get("div"), None);
    }

    #[test]
    fn headings_carry_level_and_heading_labels() {
        let map = TagActionMap::default();
        match map.get("h2") {
            Some(TagAction::LabeledBlock(l)) => {
                assert!(l.contains(&labels::H2));
                assert!(l.contains(&labels::HEADING));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn inline_tags_keep_level() {
        let map = TagActionMap::default();
        for tag in ["b", "span", "abbr", "font"] {
            let action = map.get(tag).unwrap();
            assert!(!action.changes_tag_level(), "{}", tag);
            assert!(!action.forces_flush(), "{}", tag);
        }
        assert!(TagAction::Body.changes_tag_level());
    }

    #[test]
    fn block_level_actions_flush() {
        let map = TagActionMap::default();
        for tag in ["script", "body", "li", "h1"] {
            assert!(map.get(tag).unwrap().forces_flush(), "{}", tag);
        }
        assert!(!TagAction::AnchorText.forces_flush());
    }
}
