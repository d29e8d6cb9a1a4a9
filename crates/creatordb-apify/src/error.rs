use thiserror::Error;

/// Errors returned by the scrape-provider client.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider signalled that the synchronous run exceeded its own time
    /// budget (HTTP 408).
    #[error("scrape run exceeded the provider's time budget")]
    Timeout,

    /// The provider returned a non-success status other than 408. The raw
    /// status and body are kept for diagnostics and stay out of
    /// caller-facing messages.
    #[error("scrape provider error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A raw record could not be mapped into a canonical record.
    #[error("cannot map {context}: {reason}")]
    Normalization { context: String, reason: String },
}
