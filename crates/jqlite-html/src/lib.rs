//! jqlite HTML front end
//!
//! Builds a [`jqlite_dom::Document`] from HTML source with html5ever.

mod parser;

pub use parser::HtmlParser;

use jqlite_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// HTML parsing error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Read(#[from] std::io::Error),
}
