use thiserror::Error;

/// Errors raised by [`crate::optimizer::optimize`] before or during a solve.
///
/// Infeasible and unbounded problems are not errors; they are reported
/// through the end user's `status` field.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// An input array does not match the horizon length.
    #[error("{asset}[{index}].{field} has length {len}, expected horizon length {expected}")]
    InvalidShape {
        asset: String,
        index: usize,
        field: &'static str,
        len: usize,
        expected: usize,
    },
    /// A scalar or array entry violates its declared range.
    #[error("{asset}[{index}].{field}: {message}")]
    InvalidInput {
        asset: String,
        index: usize,
        field: &'static str,
        message: String,
    },
    /// The grid names a loss function that is not in the registry.
    #[error("unknown objective `{0}`")]
    UnknownObjective(String),
    /// The solver failed for a reason unrelated to feasibility.
    #[error("solver failure: {0}")]
    Solver(String),
}
