//! Filter engine
//!
//! Strips filter fragments off the head of a selector tail and narrows the
//! candidate set with each one, stopping at the first character that cannot
//! start a fragment (a space, a combinator, a comma).

use jqlite_dom::NodeId;

use crate::engine::SelectorEngine;
use crate::expr::{MatchContext, Predicate};
use crate::grammar::{self, Fragment};
use crate::SelectorError;

/// Result of a filter pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    /// Candidates that survived, in their original order
    pub matched: Vec<NodeId>,
    /// Selector text left for the resolver
    pub remainder: String,
}

impl<'d> SelectorEngine<'d> {
    /// Narrow `candidates` by the filter fragments leading `tail`.
    ///
    /// With `keep == false` the sense of every predicate is inverted, which
    /// is how `:not(...)` and `.not()` are evaluated.
    pub fn filter(
        &self,
        tail: &str,
        candidates: &[NodeId],
        keep: bool,
    ) -> Result<Filtered, SelectorError> {
        let mut text = tail;
        let mut current = candidates.to_vec();

        while grammar::starts_filter(text) {
            let Some((fragment, consumed)) = grammar::next_fragment(text) else {
                tracing::trace!(remainder = text, "filter stalled");
                break;
            };
            text = &text[consumed..];

            current = match &fragment {
                Fragment::Pseudo { name, arg } if name == "not" => {
                    let inner = arg.as_deref().unwrap_or_default();
                    self.filter(inner, &current, !keep)?.matched
                }
                _ => {
                    let predicate = Predicate::from_fragment(&fragment)?;
                    self.grep(&predicate, &current, keep)?
                }
            };
        }

        Ok(Filtered {
            matched: current,
            remainder: text.to_string(),
        })
    }

    /// Keep the candidates for which `predicate` evaluates to `keep`
    fn grep(
        &self,
        predicate: &Predicate,
        candidates: &[NodeId],
        keep: bool,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let ctx = MatchContext { engine: self, candidates };
        let mut out = Vec::with_capacity(candidates.len());
        for (index, &node) in candidates.iter().enumerate() {
            if predicate.matches(&ctx, node, index)? == keep {
                out.push(node);
            }
        }
        tracing::trace!(?predicate, before = candidates.len(), after = out.len(), "grep");
        Ok(out)
    }
}
