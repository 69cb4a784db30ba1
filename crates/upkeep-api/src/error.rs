use thiserror::Error;

/// Top-level error type for the `upkeep-api` crate.
///
/// Covers every failure mode of a remote call: transport, HTTP status,
/// body decoding, and application-level errors reported inside an
/// otherwise-successful response. `upkeep-core` wraps these into its
/// own error type; it never retries them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Protocol ────────────────────────────────────────────────────
    /// The API answered with a non-2xx status.
    #[error("{method} returned HTTP {status}")]
    Http { method: String, status: u16 },

    /// The response body could not be decoded as JSON, or lacked an
    /// expected field. Carries a body preview for debugging.
    #[error("error decoding response of {method}: {message}")]
    Decode {
        method: String,
        message: String,
        body: String,
    },

    // ── Application ─────────────────────────────────────────────────
    /// The API reported an error in the response envelope
    /// (`stat` field not `"ok"`).
    #[error("{method} returned error: {message}")]
    Api { method: String, message: String },
}
