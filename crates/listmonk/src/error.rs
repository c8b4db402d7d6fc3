//! Errors from the listmonk REST API layer.

/// Failures talking to listmonk.
#[derive(Debug, thiserror::Error)]
pub enum ListmonkError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// listmonk returned a non-2xx status code.
    #[error("listmonk API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response could not be decoded into the expected shape.
    #[error("unexpected listmonk response: {0}")]
    UnexpectedResponse(String),
}
