//! # stoat-nn
//!
//! Neural network layers for Stoat, expressed as symbolic graph
//! construction.
//!
//! Provides:
//! 1. **Layer trait** — the five-operation contract between a layer and
//!    the training loop: `build_forward`, `build_backward`,
//!    `parameters`, `gradients`, `initialize_parameters_norm`
//! 2. **DenseLayer** — the trainable affine layer `y = x·W + b`, with
//!    its full backward subgraph
//! 3. **init** — deterministic seeded initialization of host-resident
//!    parameter storage
//!
//! Layers never execute anything: they append operation nodes to a
//! [`stoat_core::Graph`] and own the descriptors of their learnable
//! state, which an external engine later binds to real memory.

pub mod dense;
pub mod init;
pub mod layer;

pub use dense::DenseLayer;
pub use layer::{GradientSet, Layer, ParameterSet};
