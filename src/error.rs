use thiserror::Error;

/// Errors from the generation and rendering pipeline.
#[derive(Debug, Error)]
pub enum BookError {
    /// A required story parameter is missing or out of range. Generation
    /// never starts when validation fails.
    #[error("missing or invalid field: {0}")]
    Validation(&'static str),

    /// The generation capability failed for one unit. The run continues;
    /// the unit's body becomes a visible placeholder.
    #[error("generation failed for {unit}: {source}")]
    Generation {
        unit: String,
        #[source]
        source: LlmError,
    },

    /// The minimum-word-count loop hit its attempt cap for one unit.
    #[error("{unit} did not reach the minimum length after {attempts} attempts")]
    RetryExhausted { unit: String, attempts: u32 },

    /// The manuscript could not be rendered. The manuscript itself is
    /// untouched and rendering can be retried.
    #[error("render failed: {0}")]
    Render(String),
}

/// Errors from the content generation capability.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("API returned an empty completion")]
    Empty,
}
