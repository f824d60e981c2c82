//! The [`Block`] data model: one heading-anchored section of a page.

use serde::{Deserialize, Serialize};

/// One content section of a page, anchored by a heading and its enclosing
/// structural container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Heading text with whitespace runs collapsed, at least two characters.
    pub heading: String,

    /// Heading rank, 1 through 6.
    pub level: u8,

    /// Character count of the container's visible text.
    pub text_length: usize,

    /// Buttons plus links with short visible text.
    pub cta_count: usize,

    pub has_form: bool,
    pub has_list: bool,
    pub has_embedded_frame: bool,
    pub has_video: bool,
    pub has_table: bool,

    /// Number of `<img>` elements.
    pub image_count: usize,

    /// Whether an embedded JSON-LD payload declares a `FAQPage`.
    pub has_faq_structured_data: bool,

    /// Semantic group assigned by the classifier. Never empty.
    pub group: String,
}

impl Block {
    /// Heading tag name, e.g. `"H2"`.
    pub fn level_label(&self) -> String {
        format!("H{}", self.level)
    }
}
