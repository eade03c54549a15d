use std::path::PathBuf;
use thiserror::Error;

/// Errors from the journal store and the scripture catalog
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed journal {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown book: {0}")]
    UnknownBook(String),

    #[error("{book} has {max} chapters, there is no chapter {chapter}")]
    ChapterOutOfRange { book: &'static str, chapter: u32, max: u32 },

    #[error("{reference} has no verse {verse}")]
    VerseOutOfRange { reference: String, verse: u32 },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;
