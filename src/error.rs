// 🚨 Extraction Errors - Only structural corruption is fatal
// Node-level problems are absorbed by the walker; these are the cases that abort a document

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The input could not be parsed as a document tree at all
    #[error("document is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The tree parsed, but its root is not a bill
    #[error("expected a bill document root, found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid extractor configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
