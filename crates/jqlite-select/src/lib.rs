//! jqlite selector engine
//!
//! A small, regex-driven selector resolver in the style of early jQuery:
//! tag, `#id`, `.class`, `*`, descendant (space or `//`), child (`>` or
//! `/`), `+`, `~`, parent (`..`), OR (`,` or `|`), `[@attr op value]`,
//! `[selector]` and a table of pseudo-classes (`:eq(n)`, `:first`,
//! `:even`, `:first-child`, `:contains(text)`, `:not(expr)`, ...).
//!
//! ```rust,ignore
//! use jqlite_select::find;
//!
//! let items = find(&doc, "ul li:first-child", None)?;
//! ```

mod config;
mod engine;
mod error;
mod expr;
mod filter;
mod grammar;
mod token;

pub use config::SelectorConfig;
pub use engine::{merge, ResolveState, SelectorEngine};
pub use error::SelectorError;
pub use expr::{AttrTest, MatchContext, NthChild, Parity, Position, Predicate, Siblings};
pub use filter::Filtered;
pub use grammar::Fragment;
pub use token::Combinator;

use jqlite_dom::{Document, NodeId};

/// Resolve `selector` against `context` (the document when `None`)
pub fn find(
    document: &Document,
    selector: &str,
    context: Option<NodeId>,
) -> Result<Vec<NodeId>, SelectorError> {
    SelectorEngine::new(document).resolve(selector, context)
}

/// Keep the `candidates` matching the filter expression `selector`
pub fn filter(
    document: &Document,
    selector: &str,
    candidates: &[NodeId],
) -> Result<Filtered, SelectorError> {
    SelectorEngine::new(document).filter(selector, candidates, true)
}

/// Drop the `candidates` matching the filter expression `selector`
pub fn not(
    document: &Document,
    selector: &str,
    candidates: &[NodeId],
) -> Result<Filtered, SelectorError> {
    SelectorEngine::new(document).filter(selector, candidates, false)
}

/// Check whether any candidate matches the filter expression `selector`
pub fn is(document: &Document, selector: &str, candidates: &[NodeId]) -> Result<bool, SelectorError> {
    Ok(!filter(document, selector, candidates)?.matched.is_empty())
}
