use thiserror::Error;

/// Errors produced by the annotation client.
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// `GEMINI_API_KEY` is not set in the environment.
    #[error("API key missing: set GEMINI_API_KEY")]
    MissingApiKey,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but not in the shape we expect.
    #[error("Unexpected API response: {0}")]
    BadResponse(String),
}
