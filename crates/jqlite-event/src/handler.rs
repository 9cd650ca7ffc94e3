//! Handlers
//!
//! A [`Handler`] is a cheaply clonable callback. Clones share identity, so
//! the same handler can be bound to several elements and later unbound by
//! passing any clone back to the registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use jqlite_dom::NodeId;

use crate::event::{Event, Flow};

/// Handler identifier, assigned by the registry on first bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

impl HandlerId {
    /// Slot used for a pre-existing inline handler
    pub const INLINE: HandlerId = HandlerId(0);
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Callback = dyn FnMut(&mut Event, NodeId) -> anyhow::Result<Flow>;

pub(crate) struct HandlerInner {
    callback: RefCell<Box<Callback>>,
}

/// Event handler callback
#[derive(Clone)]
pub struct Handler {
    inner: Rc<HandlerInner>,
}

impl Handler {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&mut Event, NodeId) -> anyhow::Result<Flow> + 'static,
    {
        Self {
            inner: Rc::new(HandlerInner {
                callback: RefCell::new(Box::new(callback)),
            }),
        }
    }

    /// Handler that never cancels and never fails
    pub fn from_fn<F>(mut callback: F) -> Self
    where
        F: FnMut(&mut Event, NodeId) + 'static,
    {
        Self::new(move |event, element| {
            callback(event, element);
            Ok(Flow::Continue)
        })
    }

    /// Invoke the callback with `element` as receiver.
    ///
    /// A handler that re-enters itself while running reports an error
    /// instead of being called twice.
    pub fn call(&self, event: &mut Event, element: NodeId) -> anyhow::Result<Flow> {
        let mut callback = self
            .inner
            .callback
            .try_borrow_mut()
            .map_err(|_| anyhow::anyhow!("handler re-entered during dispatch"))?;
        (*callback)(event, element)
    }

    /// Whether both values are clones of the same handler
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn key(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub(crate) fn downgrade(&self) -> Weak<HandlerInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn is(&self, weak: &Weak<HandlerInner>) -> bool {
        std::ptr::eq(weak.as_ptr(), Rc::as_ptr(&self.inner))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("key", &self.key()).finish()
    }
}
