//! Error aliases shared across the workspace.

/// Result alias carrying an `error_stack::Report` of the context `E`.
pub type CustomResult<T, E> = error_stack::Result<T, E>;
