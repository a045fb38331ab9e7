/// Convenience result type used across diffreel.
pub type DiffreelResult<T> = Result<T, DiffreelError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum DiffreelError {
    /// A change block could not be decoded to text.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid configuration or inconsistent caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal consistency failure while sequencing scenes.
    #[error("sequence error: {0}")]
    Sequence(String),

    /// Missing or undecodable static asset (font, canvas).
    #[error("asset error: {0}")]
    Asset(String),

    /// Failure while querying the commit source.
    #[error("source error: {0}")]
    Source(String),

    /// Failure while encoding video output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DiffreelError {
    /// Build a [`DiffreelError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`DiffreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DiffreelError::Sequence`] value.
    pub fn sequence(msg: impl Into<String>) -> Self {
        Self::Sequence(msg.into())
    }

    /// Build a [`DiffreelError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`DiffreelError::Source`] value.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`DiffreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
