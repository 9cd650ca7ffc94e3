//! Selector engine configuration

use jqlite_dom::NodeId;

/// Selector engine options
#[derive(Debug, Clone, Default)]
pub struct SelectorConfig {
    /// Context used when a call passes none (or passes a node that is
    /// neither an element nor the document). Falls back to the document.
    pub default_context: Option<NodeId>,
}

impl SelectorConfig {
    /// Use `context` as the default context
    pub fn with_default_context(mut self, context: NodeId) -> Self {
        self.default_context = Some(context);
        self
    }
}
