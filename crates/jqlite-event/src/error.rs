use jqlite_dom::NodeId;
use thiserror::Error;

use crate::event::EventType;
use crate::handler::HandlerId;

/// Errors raised while dispatching events
#[derive(Debug, Error)]
pub enum EventError {
    /// A handler failed; handlers after it were not run
    #[error("{event_type} handler {handler} on node {element} failed: {source}")]
    Handler {
        event_type: EventType,
        element: NodeId,
        handler: HandlerId,
        #[source]
        source: anyhow::Error,
    },
}
