use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CatalogError – library-level failures
// ---------------------------------------------------------------------------

/// Errors produced while reading configuration or a single source table.
///
/// None of these ever reach a search caller: per-file failures are logged and
/// the file is skipped, so the only catalog-wide signal is an empty catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config error in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    /// The bytes are not valid text in any of the configured encodings.
    #[error("{path:?} could not be decoded with any of: {tried}")]
    Undecodable { path: PathBuf, tried: String },

    #[error("table has no header row")]
    EmptyTable,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Wrap a `std::io::Error` with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
