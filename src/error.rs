use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Everything else (short text, ambiguous fields, missing sections) degrades
/// into a well-formed record instead of an error.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Input declared as JSON did not parse.
    #[error("malformed JSON input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Input declared as JSON parsed, but holds no listing object.
    #[error("unsupported JSON input: {0}")]
    UnsupportedInput(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
