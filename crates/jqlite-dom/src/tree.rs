//! DOM Tree (arena-based allocation)
//!
//! Nodes live in one `Vec` and are never freed; `remove` only detaches a
//! subtree, so `NodeId`s stay valid for the life of the tree.

use crate::{ElementData, InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree (detached ones included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, s: InternedString) -> &str {
        self.interner.get(s)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a detached element; the tag is lowercased
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::doctype(name))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// Appending a node under itself or one of its own descendants is
    /// ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!(%parent, %child, "refusing to append an ancestor into its descendant");
            return;
        }
        self.remove(child);

        let last = self.nodes[parent.0 as usize].last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
    }

    /// Detach a node (and its subtree) from its parent
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Set an attribute, keeping the cached id and class list in sync
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name_key = self.interner.intern(name);
        let cached_id = (name == "id").then(|| self.interner.intern(value));
        let classes: Option<Vec<InternedString>> = (name == "class").then(|| {
            value
                .split_whitespace()
                .map(|c| self.interner.intern(c))
                .collect()
        });

        let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) else {
            return;
        };
        elem.set_attr(name_key, value.to_string());
        if let Some(cached) = cached_id {
            elem.id = Some(cached);
        }
        if let Some(classes) = classes {
            elem.classes = classes;
        }
    }

    /// Remove an attribute, keeping the cached id and class list in sync
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let Some(key) = self.interner.lookup(name) else { return };
        let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) else {
            return;
        };
        elem.remove_attr(key);
        match name {
            "id" => elem.id = None,
            "class" => elem.classes.clear(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Check whether a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Lowercased tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| self.resolve(e.name))
    }

    /// Attribute value of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let key = self.interner.lookup(name)?;
        self.element(id)?.get_attr(key)
    }

    /// Check for an attribute regardless of its value
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        match (self.interner.lookup(name), self.element(id)) {
            (Some(key), Some(elem)) => elem.has_attr(key),
            _ => false,
        }
    }

    /// The element's `id`
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.id.map(|s| self.resolve(s))
    }

    /// Check the cached class list
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        match (self.interner.lookup(class), self.element(id)) {
            (Some(key), Some(elem)) => elem.classes.contains(&key),
            _ => false,
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for (child_id, child) in self.children(id) {
            match &child.data {
                NodeData::Text(t) => out.push_str(t),
                NodeData::Element(_) => self.collect_text(child_id, out),
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.to_option()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling.to_option()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling.to_option()
    }

    /// Iterate over all child nodes
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Number of child nodes of any type
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .filter(|(_, n)| n.is_element())
            .map(|(child, _)| child)
            .collect()
    }

    /// Element siblings of a node, the node itself included, in order
    pub fn element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self.element_children(parent),
            None if self.is_element(id) => vec![id],
            None => Vec::new(),
        }
    }

    /// Next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.next_sibling(id);
        while let Some(sib) = cur {
            if self.is_element(sib) {
                return Some(sib);
            }
            cur = self.next_sibling(sib);
        }
        None
    }

    /// All descendant elements in depth-first pre-order
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(id, None, &mut out);
        out
    }

    /// Descendant elements with the given tag name (`*` for all),
    /// compared ASCII case-insensitively
    pub fn get_elements_by_tag_name(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        if tag == "*" {
            self.collect_elements(id, None, &mut out);
        } else if let Some(key) = self.interner.lookup(&tag.to_ascii_lowercase()) {
            self.collect_elements(id, Some(key), &mut out);
        }
        out
    }

    fn collect_elements(&self, id: NodeId, tag: Option<InternedString>, out: &mut Vec<NodeId>) {
        for (child_id, child) in self.children(id) {
            if let Some(elem) = child.as_element() {
                if tag.is_none_or(|t| t == elem.name) {
                    out.push(child_id);
                }
                self.collect_elements(child_id, tag, out);
            }
        }
    }

    /// Check whether `ancestor` contains `id`
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the child nodes of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
