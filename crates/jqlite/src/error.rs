/// jqlite error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTML error: {0}")]
    Html(#[from] jqlite_html::ParseError),

    #[error("Selector error: {0}")]
    Selector(#[from] jqlite_select::SelectorError),

    #[error("Event error: {0}")]
    Event(#[from] jqlite_event::EventError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
