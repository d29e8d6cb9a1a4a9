use thiserror::Error;

/// Errors raised while generating or caching creator analyses.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network or TLS failure talking to the completion provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion provider returned a non-success status. Status and
    /// body are kept for logs; caller-facing messages stay generic.
    #[error("completion provider error (status {status}): {body}")]
    Provider { status: u16, body: String },

    /// The completion violated the structural contract. `raw` holds the
    /// response truncated for diagnostics; nothing is cached.
    #[error("completion failed structural validation: {reason}")]
    Contract { reason: String, raw: String },

    /// No stored posts exist for the requested creator; the caller must
    /// ingest posts before requesting an analysis.
    #[error("no stored posts for this creator")]
    NoPosts,

    /// Persistence failure while reading posts or the analysis cache.
    #[error(transparent)]
    Db(#[from] creatordb_db::DbError),
}
