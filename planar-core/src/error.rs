/// Error types for the geometric core
use thiserror::Error;

/// Precondition violations detected before the arithmetic that would
/// otherwise produce NaN or infinite values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("degenerate triangle: projected vertices are collinear")]
    DegenerateTriangle,

    #[error("singular system: basis vectors are linearly dependent")]
    SingularSystem,
}

impl GeometryError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
