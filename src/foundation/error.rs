/// Convenience result type used across arabsub.
pub type ArabsubResult<T> = Result<T, ArabsubError>;

/// Top-level error taxonomy used by the pipeline boundaries.
///
/// Pure in-memory stages (markup parsing, timing, wrapping) never produce these; they return empty
/// results instead. Errors only surface where data crosses an I/O or configuration boundary.
#[derive(thiserror::Error, Debug)]
pub enum ArabsubError {
    /// Invalid user-provided input, configuration, or missing input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading fonts or shaping text.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors while rasterizing an overlay or feeding a frame sink.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing timing exports.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArabsubError {
    /// Build an [`ArabsubError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ArabsubError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build an [`ArabsubError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`ArabsubError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build an [`ArabsubError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
