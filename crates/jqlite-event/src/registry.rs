//! Event registry
//!
//! Owns every binding made through it. Each element keeps an ordered map of
//! handlers per event type; while that map is non-empty the element's native
//! slot for the type points at the shared dispatcher. An inline handler that
//! was in the slot before the first bind is captured under id 0 and runs
//! first.

use std::collections::{BTreeMap, HashMap};
use std::rc::Weak;

use jqlite_dom::NodeId;
use serde_json::Value;

use crate::error::EventError;
use crate::event::{Event, EventType, Flow};
use crate::handler::{Handler, HandlerId, HandlerInner};

type HandlerMap = BTreeMap<HandlerId, Handler>;

/// What an element's native `on<type>` slot holds
#[derive(Debug, Clone)]
enum NativeSlot {
    /// A handler set directly on the element
    Inline(Handler),
    /// The shared dispatcher, reading the element's handler map
    Dispatcher,
}

/// Registry of event bindings
#[derive(Debug)]
pub struct EventRegistry {
    next_id: u64,
    ids: HashMap<usize, (Weak<HandlerInner>, HandlerId)>,
    bindings: HashMap<NodeId, HashMap<EventType, HandlerMap>>,
    native: HashMap<(NodeId, EventType), NativeSlot>,
    subscribers: HashMap<EventType, Vec<NodeId>>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ids: HashMap::new(),
            bindings: HashMap::new(),
            native: HashMap::new(),
            subscribers: HashMap::new(),
        }
    }

    /// Drop every binding, releasing all handlers
    pub fn dispose(self) {
        tracing::debug!(
            elements = self.bindings.len(),
            handlers = self.ids.len(),
            "disposing event registry"
        );
    }

    /// Id this registry gave `handler`, if it was ever bound here
    pub fn handler_id(&self, handler: &Handler) -> Option<HandlerId> {
        self.ids
            .get(&handler.key())
            .filter(|(weak, _)| handler.is(weak) && weak.strong_count() > 0)
            .map(|&(_, id)| id)
    }

    fn assign_id(&mut self, handler: &Handler) -> HandlerId {
        if let Some(id) = self.handler_id(handler) {
            return id;
        }
        // Entries for dropped handlers may share an address with a new one.
        self.ids.retain(|_, (weak, _)| weak.strong_count() > 0);

        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.ids.insert(handler.key(), (handler.downgrade(), id));
        id
    }

    /// Put `handler` in the element's native slot for `event_type`.
    ///
    /// Once the type is bound the inline handler lives under id 0 in the
    /// element's handler map, so it is replaced there instead.
    pub fn set_inline_handler(
        &mut self,
        element: NodeId,
        event_type: impl Into<EventType>,
        handler: Handler,
    ) {
        let event_type = event_type.into();
        match self
            .bindings
            .get_mut(&element)
            .and_then(|types| types.get_mut(&event_type))
        {
            Some(handlers) => {
                handlers.insert(HandlerId::INLINE, handler);
            }
            None => {
                self.native
                    .insert((element, event_type), NativeSlot::Inline(handler));
            }
        }
    }

    /// Bind `handler` to `element` for `event_type`.
    ///
    /// Binding the same handler twice to the same element and type is a
    /// no-op. Returns the handler's id.
    pub fn on(
        &mut self,
        element: NodeId,
        event_type: impl Into<EventType>,
        handler: &Handler,
    ) -> HandlerId {
        let event_type = event_type.into();
        let id = self.assign_id(handler);

        let handlers = self
            .bindings
            .entry(element)
            .or_default()
            .entry(event_type.clone())
            .or_default();

        if handlers.is_empty() {
            if let Some(NativeSlot::Inline(inline)) =
                self.native.remove(&(element, event_type.clone()))
            {
                handlers.insert(HandlerId::INLINE, inline);
            }
        }
        handlers.insert(id, handler.clone());

        self.native
            .insert((element, event_type.clone()), NativeSlot::Dispatcher);
        let subscribers = self.subscribers.entry(event_type.clone()).or_default();
        if !subscribers.contains(&element) {
            subscribers.push(element);
        }

        tracing::debug!(%element, %event_type, handler = %id, "bound");
        id
    }

    /// Unbind handlers from `element`.
    ///
    /// With no type every type is cleared. With no handler every handler of
    /// the type goes, including a captured inline one. Returns the number of
    /// handlers removed.
    pub fn off(
        &mut self,
        element: NodeId,
        event_type: Option<&EventType>,
        handler: Option<&Handler>,
    ) -> usize {
        let id = match handler {
            Some(handler) => match self.handler_id(handler) {
                Some(id) => Some(id),
                None => return 0,
            },
            None => None,
        };

        match event_type {
            Some(event_type) => self.remove(element, event_type, id),
            None => {
                let types: Vec<EventType> = self
                    .bindings
                    .get(&element)
                    .map(|types| types.keys().cloned().collect())
                    .unwrap_or_default();
                types
                    .iter()
                    .map(|event_type| self.remove(element, event_type, id))
                    .sum()
            }
        }
    }

    /// Unbind a single handler by the id [`EventRegistry::on`] returned
    pub fn off_id(&mut self, element: NodeId, event_type: &EventType, id: HandlerId) -> bool {
        self.remove(element, event_type, Some(id)) > 0
    }

    fn remove(&mut self, element: NodeId, event_type: &EventType, id: Option<HandlerId>) -> usize {
        let Some(types) = self.bindings.get_mut(&element) else {
            return 0;
        };
        let Some(handlers) = types.get_mut(event_type) else {
            return 0;
        };

        let removed = match id {
            Some(id) => usize::from(handlers.remove(&id).is_some()),
            None => std::mem::take(handlers).len(),
        };

        if handlers.is_empty() {
            types.remove(event_type);
            if types.is_empty() {
                self.bindings.remove(&element);
            }
            self.native.remove(&(element, event_type.clone()));
            if let Some(subscribers) = self.subscribers.get_mut(event_type) {
                subscribers.retain(|&node| node != element);
                if subscribers.is_empty() {
                    self.subscribers.remove(event_type);
                }
            }
        }

        if removed > 0 {
            tracing::debug!(%element, %event_type, removed, "unbound");
        }
        removed
    }

    /// Drop everything bound to `element`, inline slots included
    pub fn forget_element(&mut self, element: NodeId) {
        self.bindings.remove(&element);
        self.native.retain(|(node, _), _| *node != element);
        self.subscribers.retain(|_, nodes| {
            nodes.retain(|&node| node != element);
            !nodes.is_empty()
        });
    }

    /// Fire `event_type` on `element`, or on every subscribed element when
    /// `element` is `None`.
    ///
    /// Returns `false` when any handler cancelled. An element whose slot is
    /// still a bare inline handler has it called directly. A handler error
    /// stops the emission and is returned.
    pub fn emit(
        &self,
        event_type: impl Into<EventType>,
        data: Vec<Value>,
        element: Option<NodeId>,
    ) -> Result<bool, EventError> {
        let event_type = event_type.into();
        let targets = match element {
            Some(element) => vec![element],
            None => self.subscribers(&event_type).to_vec(),
        };
        tracing::trace!(%event_type, targets = targets.len(), "emit");

        let mut result = true;
        for target in targets {
            let mut event = Event::new(event_type.clone(), target).with_data(data.clone());
            result &= self.run_slot(target, &mut event)?;
        }
        Ok(result)
    }

    /// Entry point for the host: run the element's native slot for
    /// `event_type`, synthesizing a minimal event when none is passed.
    ///
    /// A host event carries its own type, and that type picks the slot.
    /// When it disagrees with `event_type` a warning is logged.
    pub fn handle_native(
        &self,
        element: NodeId,
        event_type: impl Into<EventType>,
        event: Option<Event>,
    ) -> Result<bool, EventError> {
        let event_type = event_type.into();
        let mut event = match event {
            Some(event) => {
                if event.event_type != event_type {
                    tracing::warn!(
                        %element,
                        requested = %event_type,
                        actual = %event.event_type,
                        "host event type differs from requested type"
                    );
                }
                event
            }
            None => Event::new(event_type, element),
        };
        self.run_slot(element, &mut event)
    }

    /// Run whatever the element's native slot for the event's type holds
    fn run_slot(&self, element: NodeId, event: &mut Event) -> Result<bool, EventError> {
        match self.native.get(&(element, event.event_type.clone())) {
            Some(NativeSlot::Dispatcher) => self.handle(element, event),
            Some(NativeSlot::Inline(handler)) => {
                let flow = handler.call(event, element).map_err(|source| EventError::Handler {
                    event_type: event.event_type.clone(),
                    element,
                    handler: HandlerId::INLINE,
                    source,
                })?;
                Ok(Self::apply(flow, event))
            }
            None => Ok(true),
        }
    }

    /// Shared dispatcher: run the element's handlers for `event` in id
    /// order with the element as receiver
    pub fn handle(&self, element: NodeId, event: &mut Event) -> Result<bool, EventError> {
        let Some(handlers) = self
            .bindings
            .get(&element)
            .and_then(|types| types.get(&event.event_type))
        else {
            return Ok(true);
        };

        let mut result = true;
        for (&id, handler) in handlers {
            let flow = handler.call(event, element).map_err(|source| EventError::Handler {
                event_type: event.event_type.clone(),
                element,
                handler: id,
                source,
            })?;
            result &= Self::apply(flow, event);
        }
        Ok(result)
    }

    fn apply(flow: Flow, event: &mut Event) -> bool {
        match flow {
            Flow::Continue => true,
            Flow::Cancel => {
                event.prevent_default();
                event.stop_propagation();
                false
            }
        }
    }

    /// Number of handlers bound to `element` for `event_type`, a captured
    /// inline handler included
    pub fn handler_count(&self, element: NodeId, event_type: &EventType) -> usize {
        self.bindings
            .get(&element)
            .and_then(|types| types.get(event_type))
            .map_or(0, BTreeMap::len)
    }

    /// Whether the element's slot for `event_type` is the dispatcher
    pub fn is_bound(&self, element: NodeId, event_type: &EventType) -> bool {
        matches!(
            self.native.get(&(element, event_type.clone())),
            Some(NativeSlot::Dispatcher)
        )
    }

    /// Elements with at least one binding for `event_type`, in bind order
    pub fn subscribers(&self, event_type: &EventType) -> &[NodeId] {
        self.subscribers
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
