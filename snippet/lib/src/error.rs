use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by snippet operations.
#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("Snippet template text is missing")]
    MissingText,

    #[error("Failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
