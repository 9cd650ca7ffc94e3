//! Events
//!
//! Event types and the minimal event object handed to handlers.

use std::fmt;

use jqlite_dom::NodeId;
use serde_json::Value;

/// Event type identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseOver,
    MouseOut,
    KeyDown,
    KeyUp,
    KeyPress,
    Focus,
    Blur,
    Change,
    Select,
    Submit,
    Reset,
    Load,
    Unload,
    Resize,
    Scroll,
    Error,
    /// Any other name, stored as given
    Custom(String),
}

impl EventType {
    /// Map a DOM event name (`"click"`, `"keydown"`, ...) to a type
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "keypress" => Self::KeyPress,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "change" => Self::Change,
            "select" => Self::Select,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "load" => Self::Load,
            "unload" => Self::Unload,
            "resize" => Self::Resize,
            "scroll" => Self::Scroll,
            "error" => Self::Error,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The DOM event name
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::KeyPress => "keypress",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Change => "change",
            Self::Select => "select",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Load => "load",
            Self::Unload => "unload",
            Self::Resize => "resize",
            Self::Scroll => "scroll",
            Self::Error => "error",
            Self::Custom(name) => name,
        }
    }

    /// Name of the inline handler property (`onclick`)
    pub fn handler_property(&self) -> String {
        format!("on{}", self.name())
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a handler asks the dispatcher to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// Prevent the default action and stop propagation; the dispatch
    /// result becomes `false`. Remaining handlers still run.
    Cancel,
}

/// Event object passed to handlers
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    /// Extra arguments supplied by `emit`
    pub data: Vec<Value>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Synthesize a minimal event for `target`
    pub fn new(event_type: impl Into<EventType>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            data: Vec::new(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Attach `emit` arguments
    pub fn with_data(mut self, data: Vec<Value>) -> Self {
        self.data = data;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
