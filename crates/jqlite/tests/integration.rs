//! Integration tests - Full pipeline from HTML to events
//!
//! Tests the complete workflow: HTML → DOM → selectors → event dispatch

use std::cell::RefCell;
use std::rc::Rc;

use jqlite::{Config, Error, Event, EventType, Flow, Handler, NodeId, Session};
use serde_json::json;

const PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
        <head><title>Shop</title></head>
        <body>
            <div id="cart">
                <ul>
                    <li class="line">Apples</li>
                    <li class="line sale">Pears</li>
                    <li class="line">Plums</li>
                </ul>
                <button class="buy">Buy</button>
                <button class="clear" disabled>Clear</button>
            </div>
            <div id="footer"><p>Contact</p></div>
        </body>
    </html>
"#;

fn session() -> Session {
    Session::from_html(PAGE, Config::default().with_url("https://shop.test/")).unwrap()
}

fn counter() -> (Rc<RefCell<Vec<NodeId>>>, Handler) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let handler = Handler::from_fn(move |_: &mut Event, element| sink.borrow_mut().push(element));
    (seen, handler)
}

// ============================================================================
// PIPELINE TESTS
// ============================================================================

#[test]
fn test_html_to_session() {
    let session = session();

    assert_eq!(session.document().title(), "Shop");
    assert_eq!(session.document().url(), "https://shop.test/");
    assert!(session.document().tree().len() > 10);
}

#[test]
fn test_queries() -> Result<(), Error> {
    let session = session();
    let tree = session.document().tree();

    let lines = session.find("#cart li.line")?;
    assert_eq!(lines.len(), 3);
    assert_eq!(tree.text_content(lines[1]), "Pears");

    assert_eq!(session.find("li:first-child")?, vec![lines[0]]);
    assert_eq!(session.filter(".sale", &lines)?, vec![lines[1]]);
    assert_eq!(session.not(".sale", &lines)?, vec![lines[0], lines[2]]);
    assert!(session.is(":last", &lines)?);
    assert_eq!(session.find("button:enabled")?.len(), 1);
    assert_eq!(session.find("div:contains('Contact') p")?.len(), 1);
    Ok(())
}

#[test]
fn test_unknown_pseudo_surfaces_as_selector_error() {
    let session = session();

    let err = session.find("li:sparkly").unwrap_err();
    assert!(matches!(err, Error::Selector(_)));
    assert_eq!(err.to_string(), "Selector error: Unknown pseudo-class :sparkly");
}

// ============================================================================
// EVENT TESTS
// ============================================================================

#[test]
fn test_bind_and_trigger_by_selector() -> Result<(), Error> {
    let mut session = session();
    let (seen, handler) = counter();

    let bound = session.on("li.line", "click", &handler)?;
    assert_eq!(bound.len(), 3);

    assert!(session.trigger("li.sale", "click", vec![])?);
    assert_eq!(*seen.borrow(), vec![bound[1]]);

    // broadcast reaches every bound element
    assert!(session.emit("click", vec![], None)?);
    assert_eq!(seen.borrow().len(), 4);
    Ok(())
}

#[test]
fn test_off_by_selector() -> Result<(), Error> {
    let mut session = session();
    let (seen, handler) = counter();

    session.on("li", "click", &handler)?;
    assert_eq!(session.off("li:first", Some(&EventType::Click), Some(&handler))?, 1);

    session.emit("click", vec![], None)?;
    assert_eq!(seen.borrow().len(), 2);
    Ok(())
}

#[test]
fn test_cancelled_submit() -> Result<(), Error> {
    let mut session = session();
    let payload = Rc::new(RefCell::new(None));

    let sink = payload.clone();
    session.on(
        "button.buy",
        "click",
        &Handler::new(move |event, _| {
            *sink.borrow_mut() = event.data.first().cloned();
            Ok(Flow::Cancel)
        }),
    )?;

    assert!(!session.trigger("button.buy", "click", vec![json!({"sku": 7})])?);
    assert_eq!(*payload.borrow(), Some(json!({"sku": 7})));
    Ok(())
}

#[test]
fn test_handler_error_propagates() -> Result<(), Error> {
    let mut session = session();
    session.on(
        "#footer",
        "focus",
        &Handler::new(|_, _| Err(anyhow::anyhow!("no focus here"))),
    )?;

    let err = session.trigger("#footer", "focus", vec![]).unwrap_err();
    assert!(matches!(err, Error::Event(_)));
    assert!(err.to_string().contains("no focus here"));
    Ok(())
}

#[test]
fn test_remove_drops_bindings() -> Result<(), Error> {
    let mut session = session();
    let (seen, handler) = counter();

    session.on("li", "click", &handler)?;
    let cart = session.find("#cart")?[0];
    session.remove(cart);

    assert!(session.find("li")?.is_empty());
    assert!(session.events().subscribers(&EventType::Click).is_empty());
    session.emit("click", vec![], None)?;
    assert!(seen.borrow().is_empty());
    Ok(())
}

#[test]
fn test_clear_events() -> Result<(), Error> {
    let mut session = session();
    let (seen, handler) = counter();

    session.on("button", "click", &handler)?;
    session.clear_events();
    session.trigger("button", "click", vec![])?;

    assert!(seen.borrow().is_empty());
    Ok(())
}
