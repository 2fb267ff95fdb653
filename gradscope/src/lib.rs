//! Debugging tools for autodiff computation graphs.
//!
//! gradscope never builds or runs a graph. It reads the structure an engine
//! already recorded, through the [`Variable`] and [`Function`] traits, and
//! turns it into Graphviz DOT ([`get_dot_graph`]) or a rendered image
//! ([`plot_dot_graph`]). The sum-backward reshaping helper lives in
//! [`shape`].

/// DOT text generation
pub mod dot;

/// Read-only view over an engine's computation graph
pub mod graph;

/// Rendering DOT through graphviz and showing the result
pub mod plot;

pub use gradscope_shape as shape;

pub use dot::{get_dot_graph, DotOptions, ToDot};
pub use graph::{Function, InputArray, NodeId, Variable};
pub use plot::{graphviz_available, plot_dot_graph, ImageFormat, PlotOptions, RenderedGraph};
