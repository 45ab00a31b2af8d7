//! Data model for end-user energy dispatch optimization.
//!
//! The crate holds pure value objects: the [`Horizon`] discretization handle,
//! the electrical assets ([`Grid`], [`Producer`], [`Storage`], [`Consumer`]),
//! the heat sub-network assets under [`heat`], and the owning [`EndUser`]
//! aggregate, together with their nested key/value document serialization.
//! The optimizer lives in the sibling `enduser-opt` crate.

pub mod consumer;
pub mod document;
pub mod enduser;
pub mod grid;
pub mod heat;
pub mod horizon;
pub mod producer;
pub mod storage;

// Re-export commonly used items for convenience
pub use consumer::Consumer;
pub use document::{Document, DocumentError};
pub use enduser::{EndUser, SolveStatus};
pub use grid::Grid;
pub use heat::{HeatConsumer, HeatNode, HeatProducer, HeatStorage};
pub use horizon::Horizon;
pub use producer::Producer;
pub use storage::Storage;
