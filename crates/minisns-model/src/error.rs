//! Model-level error types.

/// Errors raised while building model values from untyped input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The attribute data type tag is not one SNS understands.
    #[error("unknown message attribute data type: {0}")]
    UnknownDataType(String),
}
