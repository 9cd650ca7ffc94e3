//! Example: Basic usage of jqlite

use jqlite::{Config, Flow, Handler, Session};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<ul id="menu">
  <li class="item">Home</li>
  <li class="item">About</li>
  <li class="item"><a href="/contact">Contact</a></li>
</ul>
<form id="signup">
  <input type="text" name="email">
  <input type="checkbox" name="terms">
  <input type="submit" value="Sign up">
</form>
"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = Session::from_html(PAGE, Config::default())?;
    println!("jqlite v{} loaded {} nodes", jqlite::VERSION, session.document().tree().len());

    let tree = session.document().tree();
    for item in session.find("#menu li:odd")? {
        println!("odd item: {}", tree.text_content(item).trim());
    }
    println!("links: {}", session.find("li[a]")?.len());
    println!("form controls: {}", session.find("#signup :input")?.len());

    // Refuse the submit unless the terms box is ticked
    let terms = session.find("#signup :checkbox")?;
    session.on(
        "#signup",
        "submit",
        &Handler::new(move |_, _| {
            if terms.is_empty() {
                anyhow::bail!("terms checkbox missing");
            }
            Ok(Flow::Cancel)
        }),
    )?;

    let accepted = session.trigger("#signup", "submit", vec![])?;
    println!("submit accepted: {accepted}");
    Ok(())
}
