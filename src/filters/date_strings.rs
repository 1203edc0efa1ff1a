use super::Filter;
use crate::document::{labels, PageCategory, TextDocument};
use crate::error::Result;

/// Treats pages full of dates (archives, listings) as having no content,
/// unless they were recognized as detail pages.
#[derive(Debug, Clone, Copy)]
pub struct ContentDateStringNumberFilter {
    pub max_date_strings: usize,
}

impl ContentDateStringNumberFilter {
    pub fn new(max_date_strings: usize) -> Self {
        Self { max_date_strings }
    }
}

impl Filter for ContentDateStringNumberFilter {
    fn name(&self) -> &'static str {
        "ContentDateStringNumberFilter"
    }

    fn process(&self, doc: &mut TextDocument) -> Result<bool> {
        if doc.date_time_count < self.max_date_strings || doc.page_category == PageCategory::Detail {
            return Ok(false);
        }

        let mut changed = false;
        for block in doc.blocks.iter_mut() {
            if !block.has_label(labels::TOO_MANY_DATE_STRING_CONTENT) {
                block.add_label(labels::TOO_MANY_DATE_STRING_CONTENT);
                changed = true;
            }
            changed |= block.set_is_content(false);
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{content, doc, flags};

    fn dated_doc(count: usize) -> TextDocument {
        let blocks = (0..count)
            .map(|i| content(&format!("2024-01-{:02} headline", i + 1), 2, i))
            .collect();
        let mut d = doc(blocks);
        d.date_time_count = count;
        d
    }

    #[test]
    fn date_heavy_listing_loses_all_content() {
        let mut d = dated_doc(9);
        assert!(ContentDateStringNumberFilter::new(8).process(&mut d).unwrap());
        assert!(flags(&d).iter().all(|c| !c));
        assert!(d
            .blocks
            .iter()
            .all(|b| b.has_label(labels::TOO_MANY_DATE_STRING_CONTENT)));
    }

    #[test]
    fn detail_pages_are_exempt() {
        let mut d = dated_doc(9);
        d.page_category = PageCategory::Detail;
        assert!(!ContentDateStringNumberFilter::new(8).process(&mut d).unwrap());
        assert!(flags(&d).iter().all(|c| *c));
    }

    #[test]
    fn few_dates_are_fine() {
        let mut d = dated_doc(3);
        assert!(!ContentDateStringNumberFilter::new(8).process(&mut d).unwrap());
    }
}
