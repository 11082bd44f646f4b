use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for the search service
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to spawn search worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("Search worker is no longer running")]
    WorkerUnavailable,

    #[error("Query dispatcher is no longer running")]
    DispatcherUnavailable,

    #[error("Failed to read config from '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the caller doesn't need the
/// error value, only the log line.
///
/// # Examples
///
/// ```ignore
/// use kotoba_search::error::ResultExt;
///
/// // Log and continue if the worker already shut down
/// worker.clear("vocab").log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?e,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?e,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation warning"
                );
                None
            }
        }
    }
}
