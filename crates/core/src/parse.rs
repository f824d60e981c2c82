//! HTML parsing.
//!
//! This module provides the [`Document`] type, a thin wrapper around
//! `scraper::Html` exposing the body lookup the extractor starts from.
//!
//! # Example
//!
//! ```rust
//! use blockmap_core::Document;
//!
//! let doc = Document::parse("<html><body><section><h2>Pricing</h2></section></body></html>").unwrap();
//! assert_eq!(doc.body().value().name(), "body");
//! ```

use scraper::{ElementRef, Html};

use crate::Result;

/// Represents a parsed HTML document.
///
/// The document is never mutated after parsing; regions the extractor
/// ignores are skipped during traversal instead of being removed.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Parsing is lenient: malformed markup is repaired the way browsers do
    /// it, so this only fails for inputs the tree builder cannot represent.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// The `<body>` element, or the root element when there is none.
    pub fn body(&self) -> ElementRef<'_> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .unwrap_or_else(|| self.html.root_element())
    }
}
