//! MILP dispatch optimization for small end-user energy systems.
//!
//! Takes a populated [`enduser_model::EndUser`] graph, translates it into a
//! mixed-integer linear program over the optimization horizon, solves it,
//! and writes the per-step solution back onto the assets.

pub mod error;
pub mod objective;
pub mod optimizer;
pub mod plot;
pub mod validate;

// Re-export commonly used items for convenience
pub use error::OptimizeError;
pub use optimizer::optimize;
