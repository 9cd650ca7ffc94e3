//! jqlite events
//!
//! A registry of per-element event handlers with one shared dispatcher.
//! Handlers bound through [`EventRegistry::on`] run in id order; a handler
//! returning [`Flow::Cancel`] prevents the default action and makes the
//! dispatch report `false`. [`EventRegistry::emit`] fires a type on one
//! element or on every element subscribed to it.

mod error;
mod event;
mod handler;
mod registry;

pub use error::EventError;
pub use event::{Event, EventType, Flow};
pub use handler::{Handler, HandlerId};
pub use registry::EventRegistry;
