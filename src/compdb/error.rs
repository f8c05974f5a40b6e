use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompdbError {
    #[error("Failed to read compilation database: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse compilation database JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed compilation database entry: {0}")]
    MalformedEntry(String),
}
