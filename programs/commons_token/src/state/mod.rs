//! State structures for the commons token protocol

pub mod commons;
pub mod contributor;

pub use commons::*;
pub use contributor::*;
