//! Document - High-level document API

use crate::{DomTree, InternedString, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty `html > head + body` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built
    /// externally
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let html = tree
            .element_children(tree.root())
            .into_iter()
            .find(|&id| tree.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);

        let (mut head, mut body) = (NodeId::NONE, NodeId::NONE);
        if html.is_valid() {
            for child in tree.element_children(html) {
                match tree.tag_name(child) {
                    Some("head") if !head.is_valid() => head = child,
                    Some("body") if !body.is_valid() => body = child,
                    _ => {}
                }
            }
        }

        if !body.is_valid() {
            tracing::trace!(url = %self.url, "document has no <body>");
        }
        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }

        self.tree
            .get_elements_by_tag_name(self.head_element, "title")
            .first()
            .map(|&title| self.tree.text_content(title))
            .unwrap_or_default()
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The root element (`<html>`), falling back to the first element child
    /// of the document for non-HTML trees
    pub fn document_element(&self) -> NodeId {
        if self.html_element.is_valid() {
            return self.html_element;
        }
        self.tree
            .element_children(self.tree.root())
            .first()
            .copied()
            .unwrap_or(NodeId::NONE)
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    ///
    /// With duplicate ids the first match in document order wins; callers
    /// should not depend on that.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let id_interned = self.tree.interner().lookup(id)?;
        self.find_element_with_id(self.tree.root(), id_interned)
    }

    fn find_element_with_id(&self, start: NodeId, target_id: InternedString) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if let Some(elem) = node.as_element() {
                if elem.id == Some(target_id) {
                    return Some(node_id);
                }
                if let Some(found) = self.find_element_with_id(node_id, target_id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
