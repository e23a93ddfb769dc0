//! Typed errors per subsystem. Callers that branch on the failure kind match
//! these; everything else travels as `anyhow::Error` with context chains.

use thiserror::Error;

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("category '{0}' has no tags")]
    EmptyCategory(String),

    #[error("tag '{tag}' in category '{category}' has no drawing routine; set `icon` explicitly")]
    UnresolvedIcon { category: String, tag: String },

    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("schema setup failed: {0}")]
    Schema(String),

    #[error("log corrupted at line {line}: {message}")]
    CorruptLog { line: usize, message: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Image generation errors ────────────────────────────────────────────────

/// Recoverable failure of an image producer. Never retried automatically.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Image generation failed: {0}")]
    MissingCredentials(String),

    #[error("Image generation failed: API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Image generation failed: {0}")]
    Transport(String),

    #[error("Image generation failed: no image data returned.")]
    EmptyResponse,

    #[error("Image generation failed: missing image payload.")]
    MissingPayload,

    #[error("Image generation failed: could not decode image: {0}")]
    Decode(String),

    #[error("Image generation failed: {0}")]
    Render(String),
}

// ─── Rating errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating {0} is outside 1..=5")]
    OutOfRange(i64),

    #[error("rating value '{0}' is not a number")]
    NotANumber(String),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template not found: {0}")]
    NotFound(String),
}
