//! Combinator token table
//!
//! Tokens are tried in table order at the head of the remaining selector
//! text and the first match wins, so `/..` must come before `/`.

use std::sync::LazyLock;

use jqlite_dom::{DomTree, NodeId};
use regex::Regex;

/// Structural step applied to every candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `..` or `/..`
    Parent,
    /// `>` or `/`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    FollowingSiblings,
}

static TOKENS: LazyLock<Vec<(Regex, Combinator)>> = LazyLock::new(|| {
    [
        (r"^(?:\.\.|/\.\.)", Combinator::Parent),
        (r"^(?:>|/)", Combinator::Child),
        (r"^\+", Combinator::NextSibling),
        (r"^~", Combinator::FollowingSiblings),
    ]
    .into_iter()
    .map(|(pattern, combinator)| {
        (Regex::new(pattern).expect("token pattern is valid"), combinator)
    })
    .collect()
});

/// `#id`, `.class`, a tag name, or nothing at all
static LEADING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([#.]?)([a-z0-9*_-]*)").expect("name pattern is valid"));

/// Match a combinator at the head of `text`, returning it with the length
/// of the matched token
pub fn match_token(text: &str) -> Option<(Combinator, usize)> {
    TOKENS
        .iter()
        .find_map(|(re, combinator)| re.find(text).map(|m| (*combinator, m.end())))
}

/// Leading `([#.]?)(name)` fragment of `text`
///
/// Always matches; both parts may be empty.
pub fn leading_name(text: &str) -> (&str, &str, usize) {
    match LEADING_NAME.captures(text) {
        Some(caps) => {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let name = caps.get(2).map_or("", |m| m.as_str());
            (prefix, name, caps.get(0).map_or(0, |m| m.end()))
        }
        None => ("", "", 0),
    }
}

impl Combinator {
    /// Nodes reached from `node` through this combinator
    pub fn apply(self, tree: &DomTree, node: NodeId) -> Vec<NodeId> {
        match self {
            Self::Parent => tree.parent(node).into_iter().collect(),
            Self::Child => tree.element_children(node),
            Self::NextSibling => tree.next_element_sibling(node).into_iter().collect(),
            Self::FollowingSiblings => {
                let siblings = tree.element_siblings(node);
                match siblings.iter().position(|&s| s == node) {
                    Some(pos) => siblings[pos + 1..].to_vec(),
                    None => Vec::new(),
                }
            }
        }
    }
}
