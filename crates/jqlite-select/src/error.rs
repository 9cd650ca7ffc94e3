//! Selector errors

/// Expression-table misses
///
/// Unparseable selector text is not an error: resolution stops and returns
/// whatever matched so far. Asking for a predicate the table does not have
/// is a programming error and surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Unknown pseudo-class :{name}")]
    UnknownPseudo { name: String },

    #[error("Unknown attribute operator '{op}'")]
    UnknownAttributeOperator { op: String },

    #[error("Unknown selector prefix '{prefix}'")]
    UnknownPrefix { prefix: String },
}
