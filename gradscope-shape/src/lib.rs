//! Shape primitives shared by the gradscope tools.
//!
//! The interesting entry point is [`sum::reshape_sum_backward`], which
//! reinterprets the gradient flowing out of a sum so that it broadcasts
//! back onto the summed input.

/// Normalisation of reduction axes
pub mod axes;

/// Traits and implementations for basic dimension types
pub mod dims;

/// Shape rules for the sum reduction and its gradient
pub mod sum;

pub use axes::Axes;
pub use dims::{Dim, Dimension, InsertDim, RemoveDim};
pub use sum::{reshape_sum_backward, sum_backward_shape, sum_output_shape, Reshape};
