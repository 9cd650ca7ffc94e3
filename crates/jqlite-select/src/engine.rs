//! Selector engine
//!
//! Resolves a selector string left to right. Each step consumes a
//! combinator token, an OR separator, or a leading name, then hands the rest
//! of the fragment to the filter engine. Resolution stops when the text is
//! used up or a step fails to consume anything.

use std::collections::HashSet;

use jqlite_dom::{Document, NodeId};

use crate::token::{self, Combinator};
use crate::{SelectorConfig, SelectorError};

/// Selector engine bound to one document
#[derive(Debug, Clone)]
pub struct SelectorEngine<'d> {
    document: &'d Document,
    config: SelectorConfig,
}

/// Resolution state threaded through [`SelectorEngine::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveState {
    /// Selector text not yet consumed
    pub remaining: String,
    /// Nodes currently in scope
    pub candidates: Vec<NodeId>,
    /// Nodes finished by an OR separator
    pub done: Vec<NodeId>,
}

impl ResolveState {
    /// Fresh state with `context` as the only candidate
    pub fn new(selector: &str, context: NodeId) -> Self {
        Self {
            remaining: selector.to_string(),
            candidates: vec![context],
            done: Vec::new(),
        }
    }

    /// Move the candidates, minus a leading context node, into `done`
    fn flush(&mut self, context: NodeId) {
        let mut candidates = std::mem::take(&mut self.candidates);
        if candidates.first() == Some(&context) {
            candidates.remove(0);
        }
        merge(&mut self.done, candidates);
    }

    /// Final result of a resolution
    pub fn finish(mut self, context: NodeId) -> Vec<NodeId> {
        self.flush(context);
        self.done
    }
}

/// Append `extra` to `into`, skipping nodes already present
pub fn merge(into: &mut Vec<NodeId>, extra: impl IntoIterator<Item = NodeId>) {
    let mut seen: HashSet<NodeId> = into.iter().copied().collect();
    for node in extra {
        if seen.insert(node) {
            into.push(node);
        }
    }
}

impl<'d> SelectorEngine<'d> {
    /// Engine with the default configuration
    pub fn new(document: &'d Document) -> Self {
        Self::with_config(document, SelectorConfig::default())
    }

    pub fn with_config(document: &'d Document, config: SelectorConfig) -> Self {
        Self { document, config }
    }

    pub fn document(&self) -> &'d Document {
        self.document
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Resolve `selector` relative to `context`.
    ///
    /// Returns matching elements in order without duplicates. The context
    /// itself is only returned when a step selected it explicitly.
    pub fn resolve(
        &self,
        selector: &str,
        context: Option<NodeId>,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let (context, text) = self.root_path(selector, self.normalize_context(context));

        let mut state = ResolveState::new(text, context);
        let mut last: Option<String> = None;
        while !state.remaining.is_empty() && last.as_deref() != Some(state.remaining.as_str()) {
            last = Some(state.remaining.clone());
            state = self.step(state, context)?;
        }

        if !state.remaining.trim().is_empty() {
            tracing::debug!(selector, remainder = %state.remaining, "selector stalled");
        }
        let result = state.finish(context);
        tracing::debug!(selector, context = %context, matched = result.len(), "resolved");
        Ok(result)
    }

    /// The context to resolve against: the given node if it is an element
    /// or the document, else the configured default, else the document
    pub fn normalize_context(&self, context: Option<NodeId>) -> NodeId {
        let tree = self.document.tree();
        let usable = |id: NodeId| tree.get(id).is_some_and(|n| n.is_element() || n.is_document());

        context
            .filter(|&id| usable(id))
            .or(self.config.default_context.filter(|&id| usable(id)))
            .unwrap_or_else(|| self.document.root())
    }

    /// Handle the leading `//` and `/` forms.
    ///
    /// Both restart from the root element. The single-slash form also drops
    /// everything before the next `/`, assuming the first path segment names
    /// the root element without checking it.
    fn root_path<'s>(&self, selector: &'s str, context: NodeId) -> (NodeId, &'s str) {
        let root_element = self.document.document_element();
        let root_element = if root_element.is_valid() { root_element } else { context };

        if let Some(rest) = selector.strip_prefix("//") {
            (root_element, rest)
        } else if let Some(rest) = selector.strip_prefix('/') {
            match rest.find('/') {
                Some(pos) if pos >= 1 => (root_element, &rest[pos..]),
                _ => (root_element, rest),
            }
        } else {
            (context, selector)
        }
    }

    /// One iteration of the resolution loop
    pub fn step(&self, state: ResolveState, context: NodeId) -> Result<ResolveState, SelectorError> {
        let tree = self.document.tree();
        let ResolveState { remaining, mut candidates, mut done } = state;

        let trimmed = remaining.trim();
        let mut text = trimmed.strip_prefix("//").unwrap_or(trimmed).to_string();

        let mut widened = false;
        let scope = if let Some((combinator, len)) = token::match_token(&text) {
            candidates = self.traverse(combinator, &candidates);
            text = text[len..].trim().to_string();
            candidates.clone()
        } else if text.starts_with([',', '|']) {
            let mut finished = ResolveState { remaining: String::new(), candidates, done };
            finished.flush(context);
            done = finished.done;
            candidates = vec![context];
            // The leading space keeps the filter pass below from running
            // against the bare context.
            text = format!(" {}", &text[1..]);
            candidates.clone()
        } else {
            let (prefix, name, len) = token::leading_name(&text);
            if prefix == "#" {
                candidates = self.document.get_element_by_id(name).into_iter().collect();
                text = text[len..].to_string();
                candidates.clone()
            } else {
                // `.class` and bare pseudo-classes start from every descendant;
                // the filter below applies the fragment itself.
                widened = name.is_empty() || prefix == ".";
                let tag = if widened { "*" } else { name };
                let mut scope = Vec::new();
                for &node in &candidates {
                    merge(&mut scope, tree.get_elements_by_tag_name(node, tag));
                }
                scope
            }
        };

        if !text.is_empty() {
            let filtered = self.filter(&text, &scope, true)?;
            if widened && filtered.remainder.trim() == text.trim() {
                // Nothing parsed, so the `*` scope must not leak out as matches.
                tracing::debug!(remaining = %text, "unparsed fragment after implicit wildcard");
            } else {
                candidates = filtered.matched;
            }
            text = filtered.remainder.trim().to_string();
        }

        tracing::trace!(remaining = %text, candidates = candidates.len(), "step");
        Ok(ResolveState { remaining: text, candidates, done })
    }

    fn traverse(&self, combinator: Combinator, candidates: &[NodeId]) -> Vec<NodeId> {
        let tree = self.document.tree();
        let mut out = Vec::new();
        for &node in candidates {
            merge(&mut out, combinator.apply(tree, node));
        }
        out
    }
}
