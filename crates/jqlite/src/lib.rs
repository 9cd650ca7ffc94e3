//! jqlite
//!
//! An early-jQuery style toolkit over a parsed HTML document: a selector
//! engine (`find`, `filter`, pseudo-classes) and an event bus
//! (`on`, `off`, `emit`).
//!
//! # Example
//! ```rust,ignore
//! use jqlite::{Config, Session};
//!
//! let mut session = Session::from_html(html, Config::default())?;
//! let items = session.find("ul li:first-child")?;
//! session.on("button.save", "click", &handler)?;
//! session.trigger("button.save", "click", vec![])?;
//! ```

mod config;
mod error;
mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use session::Session;

pub use jqlite_dom::{Document, NodeId};
pub use jqlite_event::{Event, EventRegistry, EventType, Flow, Handler, HandlerId};
pub use jqlite_select::{Filtered, SelectorConfig, SelectorEngine};

// Re-export sub-crates for advanced usage
pub use jqlite_dom as dom;
pub use jqlite_event as event;
pub use jqlite_html as html;
pub use jqlite_select as select;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
