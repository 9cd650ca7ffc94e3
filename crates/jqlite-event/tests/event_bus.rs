//! Event registry tests

use std::cell::RefCell;
use std::rc::Rc;

use jqlite_dom::{Document, NodeId};
use jqlite_event::{Event, EventError, EventRegistry, EventType, Flow, Handler, HandlerId};
use serde_json::json;

type Log = Rc<RefCell<Vec<String>>>;

fn elements(count: usize) -> (Document, Vec<NodeId>) {
    let mut doc = Document::default();
    let body = doc.body();
    let tree = doc.tree_mut();
    let nodes = (0..count)
        .map(|_| {
            let el = tree.create_element("div");
            tree.append_child(body, el);
            el
        })
        .collect();
    (doc, nodes)
}

fn recorder(log: &Log, label: &str) -> Handler {
    let log = log.clone();
    let label = label.to_string();
    Handler::from_fn(move |event: &mut Event, element: NodeId| {
        log.borrow_mut().push(format!("{label}:{}:{element}", event.event_type));
    })
}

// ============================================================================
// Binding and emitting
// ============================================================================

#[test]
fn test_bound_handler_runs_once_with_element() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();

    registry.on(el[0], "click", &recorder(&log, "h"));
    assert!(registry.emit("click", vec![], Some(el[0])).unwrap());

    assert_eq!(*log.borrow(), vec![format!("h:click:{}", el[0])]);
}

#[test]
fn test_handlers_run_in_bind_order() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();

    for label in ["a", "b", "c"] {
        registry.on(el[0], "click", &recorder(&log, label));
    }
    registry.emit("click", vec![], Some(el[0])).unwrap();

    let labels: Vec<String> = log.borrow().iter().map(|l| l[..1].to_string()).collect();
    assert_eq!(labels, ["a", "b", "c"]);
}

#[test]
fn test_binding_same_handler_twice_runs_once() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();
    let handler = recorder(&log, "h");

    let first = registry.on(el[0], "click", &handler);
    let second = registry.on(el[0], "click", &handler.clone());
    assert_eq!(first, second);

    registry.emit("click", vec![], Some(el[0])).unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_emit_passes_data() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    registry.on(
        el[0],
        "save",
        &Handler::from_fn(move |event, _| sink.borrow_mut().extend(event.data.iter().cloned())),
    );
    registry
        .emit("save", vec![json!(1), json!({"name": "draft"})], Some(el[0]))
        .unwrap();

    assert_eq!(*seen.borrow(), vec![json!(1), json!({"name": "draft"})]);
}

#[test]
fn test_emit_on_unbound_element_is_noop() {
    let (_doc, el) = elements(1);
    let registry = EventRegistry::new();

    assert!(registry.emit("click", vec![], Some(el[0])).unwrap());
}

// ============================================================================
// Cancelling
// ============================================================================

#[test]
fn test_cancel_returns_false_and_prevents_default() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();

    registry.on(el[0], "submit", &Handler::new(|_, _| Ok(Flow::Cancel)));
    registry.on(el[0], "submit", &recorder(&log, "after"));

    let mut event = Event::new("submit", el[0]);
    assert!(!registry.handle(el[0], &mut event).unwrap());
    assert!(event.is_default_prevented());
    assert!(event.is_propagation_stopped());
    // later handlers still run
    assert_eq!(log.borrow().len(), 1);
}

// ============================================================================
// Unbinding
// ============================================================================

#[test]
fn test_unbound_handler_not_invoked() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();
    let keep = recorder(&log, "keep");
    let dropped = recorder(&log, "drop");

    registry.on(el[0], "click", &keep);
    registry.on(el[0], "click", &dropped);
    assert_eq!(registry.off(el[0], Some(&EventType::Click), Some(&dropped)), 1);
    assert!(registry.is_bound(el[0], &EventType::Click));

    registry.emit("click", vec![], Some(el[0])).unwrap();
    assert_eq!(log.borrow().len(), 1);
    assert!(log.borrow()[0].starts_with("keep"));
}

#[test]
fn test_off_without_handler_clears_type() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();

    registry.on(el[0], "click", &recorder(&log, "a"));
    registry.on(el[0], "click", &recorder(&log, "b"));
    registry.on(el[0], "focus", &recorder(&log, "c"));

    assert_eq!(registry.off(el[0], Some(&EventType::Click), None), 2);
    assert!(!registry.is_bound(el[0], &EventType::Click));
    assert!(registry.is_bound(el[0], &EventType::Focus));

    registry.emit("click", vec![], Some(el[0])).unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn test_off_without_type_clears_element() {
    let (_doc, el) = elements(2);
    let mut registry = EventRegistry::new();
    let log = Log::default();
    let handler = recorder(&log, "h");

    registry.on(el[0], "click", &handler);
    registry.on(el[0], "focus", &handler);
    registry.on(el[1], "click", &handler);

    assert_eq!(registry.off(el[0], None, None), 2);
    assert_eq!(registry.subscribers(&EventType::Click), &[el[1]]);
    assert!(registry.subscribers(&EventType::Focus).is_empty());
}

#[test]
fn test_off_unknown_handler_removes_nothing() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();

    registry.on(el[0], "click", &Handler::from_fn(|_, _| {}));
    let stranger = Handler::from_fn(|_, _| {});
    assert_eq!(registry.off(el[0], Some(&EventType::Click), Some(&stranger)), 0);
    assert_eq!(registry.handler_count(el[0], &EventType::Click), 1);
}

#[test]
fn test_forget_element() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();

    registry.set_inline_handler(el[0], "blur", Handler::from_fn(|_, _| {}));
    registry.on(el[0], "click", &Handler::from_fn(|_, _| {}));
    registry.forget_element(el[0]);

    assert_eq!(registry.handler_count(el[0], &EventType::Click), 0);
    assert!(registry.subscribers(&EventType::Click).is_empty());
}

// ============================================================================
// Inline handlers
// ============================================================================

#[test]
fn test_inline_handler_kept_under_id_zero() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();

    registry.set_inline_handler(el[0], "click", recorder(&log, "inline"));
    registry.on(el[0], "click", &recorder(&log, "bound"));

    registry.emit("click", vec![], Some(el[0])).unwrap();
    let log = log.borrow();
    assert!(log[0].starts_with("inline"));
    assert!(log[1].starts_with("bound"));
}

#[test]
fn test_bare_inline_handler_called_directly() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();

    registry.set_inline_handler(el[0], "submit", Handler::new(|_, _| Ok(Flow::Cancel)));
    assert!(!registry.is_bound(el[0], &EventType::Submit));
    assert!(!registry.emit("submit", vec![], Some(el[0])).unwrap());
}

// ============================================================================
// Broadcast
// ============================================================================

#[test]
fn test_broadcast_reaches_every_subscriber() {
    let (_doc, el) = elements(3);
    let mut registry = EventRegistry::new();
    let log = Log::default();
    let handler = recorder(&log, "h");

    registry.on(el[0], "refresh", &handler);
    registry.on(el[2], "refresh", &handler);
    registry.on(el[1], "other", &handler);

    assert!(registry.emit("refresh", vec![], None).unwrap());
    assert_eq!(
        *log.borrow(),
        vec![format!("h:refresh:{}", el[0]), format!("h:refresh:{}", el[2])]
    );
}

#[test]
fn test_broadcast_without_subscribers() {
    let registry = EventRegistry::new();
    assert!(registry.emit("nothing", vec![json!("x")], None).unwrap());
}

// ============================================================================
// Ids and errors
// ============================================================================

#[test]
fn test_ids_are_per_registry() {
    let (_doc, el) = elements(1);
    let handler = Handler::from_fn(|_, _| {});

    let mut first = EventRegistry::new();
    first.on(el[0], "click", &Handler::from_fn(|_, _| {}));
    assert_eq!(first.on(el[0], "click", &handler), HandlerId(2));

    let mut second = EventRegistry::new();
    assert_eq!(second.on(el[0], "click", &handler), HandlerId(1));
    second.dispose();
}

#[test]
fn test_handler_error_aborts_dispatch() {
    let (_doc, el) = elements(1);
    let mut registry = EventRegistry::new();
    let log = Log::default();

    registry.on(el[0], "click", &Handler::new(|_, _| anyhow::bail!("boom")));
    registry.on(el[0], "click", &recorder(&log, "never"));

    let err = registry.emit("click", vec![], Some(el[0])).unwrap_err();
    let EventError::Handler { event_type, element, handler, source } = &err;
    assert_eq!(*event_type, EventType::Click);
    assert_eq!(*element, el[0]);
    assert_eq!(*handler, HandlerId(1));
    assert_eq!(source.to_string(), "boom");
    assert!(err.to_string().contains("boom"));
    assert!(log.borrow().is_empty());
}
