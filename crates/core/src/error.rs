use thiserror::Error;

/// Errors raised by the throw-tier operations of the engine.
///
/// Low-level converters never produce these; they return `None` for malformed
/// hex so callers can branch without unwinding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The input string is not a 3- or 6-digit hex color.
    #[error("invalid color: {0}")]
    InvalidColor(String),
    /// An argument is structurally unusable (wrong length, empty input...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ColorError>;
