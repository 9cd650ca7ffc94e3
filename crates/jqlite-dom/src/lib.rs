//! jqlite DOM - Document Object Model
//!
//! Arena-allocated DOM tree. This is the platform surface the selector
//! engine walks: parent/child/sibling links, attributes, class lists,
//! tag-name and id lookups.

mod interner;
mod node;
mod tree;
mod document;

pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Children, DomTree};
pub use document::Document;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the `NONE` sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
