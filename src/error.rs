use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("subtitle error in {}: {message}", path.display())]
    Subtitle { path: PathBuf, message: String },

    #[error("malformed index entry id: {0}")]
    InvalidEntryId(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
}
