//! Session - a document with its selector engine and event registry

use jqlite_dom::{Document, NodeId};
use jqlite_event::{EventRegistry, EventType, Handler};
use jqlite_html::HtmlParser;
use jqlite_select::{SelectorConfig, SelectorEngine};
use serde_json::Value;

use crate::{Config, Result};

/// A loaded document plus the event bindings made on it
#[derive(Debug)]
pub struct Session {
    config: Config,
    selector: SelectorConfig,
    document: Document,
    events: EventRegistry,
}

impl Session {
    /// Session over an empty document
    pub fn new(config: Config) -> Result<Self> {
        let document = Document::new(&config.url);
        Self::with_document(document, config)
    }

    /// Parse `html` and build a session over it
    pub fn from_html(html: &str, config: Config) -> Result<Self> {
        let document = HtmlParser::new().parse_with_url(html, &config.url)?;
        Self::with_document(document, config)
    }

    /// Build a session over an existing document
    pub fn with_document(document: Document, config: Config) -> Result<Self> {
        let mut selector = SelectorConfig::default();
        if let Some(sel) = config.default_context_selector.as_deref() {
            match SelectorEngine::new(&document).resolve(sel, None)?.first() {
                Some(&context) => selector = selector.with_default_context(context),
                None => tracing::warn!(selector = sel, "default context matched nothing"),
            }
        }

        tracing::info!(url = %config.url, nodes = document.tree().len(), "session ready");
        Ok(Self {
            config,
            selector,
            document,
            events: EventRegistry::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access. Bindings are keyed by node, so removing
    /// nodes here leaves their handlers registered; prefer
    /// [`Session::remove`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    /// Selector engine over this session's document
    pub fn engine(&self) -> SelectorEngine<'_> {
        SelectorEngine::with_config(&self.document, self.selector.clone())
    }

    /// Resolve `selector` against the default context
    pub fn find(&self, selector: &str) -> Result<Vec<NodeId>> {
        Ok(self.engine().resolve(selector, None)?)
    }

    /// Resolve `selector` below `context`
    pub fn find_in(&self, selector: &str, context: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.engine().resolve(selector, Some(context))?)
    }

    /// Keep the `nodes` matching `expr`
    pub fn filter(&self, expr: &str, nodes: &[NodeId]) -> Result<Vec<NodeId>> {
        Ok(self.engine().filter(expr, nodes, true)?.matched)
    }

    /// Drop the `nodes` matching `expr`
    pub fn not(&self, expr: &str, nodes: &[NodeId]) -> Result<Vec<NodeId>> {
        Ok(self.engine().filter(expr, nodes, false)?.matched)
    }

    /// Whether any of `nodes` matches `expr`
    pub fn is(&self, expr: &str, nodes: &[NodeId]) -> Result<bool> {
        Ok(!self.filter(expr, nodes)?.is_empty())
    }

    /// Bind `handler` to every element `selector` matches.
    ///
    /// Returns the matched elements.
    pub fn on(
        &mut self,
        selector: &str,
        event_type: impl Into<EventType>,
        handler: &Handler,
    ) -> Result<Vec<NodeId>> {
        let event_type = event_type.into();
        let targets = self.find(selector)?;
        for &element in &targets {
            self.events.on(element, event_type.clone(), handler);
        }
        Ok(targets)
    }

    /// Unbind from every element `selector` matches; see
    /// [`EventRegistry::off`]. Returns the number of handlers removed.
    pub fn off(
        &mut self,
        selector: &str,
        event_type: Option<&EventType>,
        handler: Option<&Handler>,
    ) -> Result<usize> {
        let targets = self.find(selector)?;
        Ok(targets
            .into_iter()
            .map(|element| self.events.off(element, event_type, handler))
            .sum())
    }

    /// Fire `event_type` on one element, or on every subscriber
    pub fn emit(
        &self,
        event_type: impl Into<EventType>,
        data: Vec<Value>,
        element: Option<NodeId>,
    ) -> Result<bool> {
        Ok(self.events.emit(event_type, data, element)?)
    }

    /// Fire `event_type` on every element `selector` matches.
    ///
    /// Returns `false` when any handler cancelled.
    pub fn trigger(
        &self,
        selector: &str,
        event_type: impl Into<EventType>,
        data: Vec<Value>,
    ) -> Result<bool> {
        let event_type = event_type.into();
        let mut result = true;
        for element in self.find(selector)? {
            result &= self
                .events
                .emit(event_type.clone(), data.clone(), Some(element))?;
        }
        Ok(result)
    }

    /// Detach `element` from the document and drop the bindings of it and
    /// its descendants
    pub fn remove(&mut self, element: NodeId) {
        let tree = self.document.tree();
        let mut gone = tree.descendant_elements(element);
        gone.push(element);

        for node in gone {
            self.events.forget_element(node);
        }
        self.document.tree_mut().remove(element);
    }

    /// Drop every binding
    pub fn clear_events(&mut self) {
        std::mem::take(&mut self.events).dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<div id='app'><p>in</p></div><p>out</p>";

    #[test]
    fn test_default_context_from_config() {
        let session = Session::from_html(PAGE, Config::default().with_default_context("#app")).unwrap();
        assert_eq!(session.find("p").unwrap().len(), 1);
    }

    #[test]
    fn test_default_context_without_match() {
        let session = Session::from_html(PAGE, Config::default().with_default_context("#nope")).unwrap();
        assert_eq!(session.find("p").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new(Config::default().with_url("https://example.com/")).unwrap();
        assert_eq!(session.document().url(), "https://example.com/");
        assert!(session.find("p").unwrap().is_empty());
    }
}
