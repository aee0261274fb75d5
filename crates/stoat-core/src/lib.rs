//! # stoat-core
//!
//! Tensor descriptors and the symbolic graph registry for Stoat.
//!
//! This crate provides:
//! - [`TensorDesc`] — a named, typed, shaped descriptor with optional
//!   host storage; no attached computation
//! - [`Shape`] — ordered dimension sizes, with logical transpose
//! - [`DType`] — the closed element-type set (F32, F64, I32)
//! - [`Graph`] — an append-only registry of symbolic operation nodes
//!   (matmul, pointwise, reduction, transpose view) returning [`NodeId`]
//!   handles
//!
//! Nothing here executes: the graph records descriptors and edges, and
//! an external engine compiles and runs the result.

pub mod dtype;
pub mod error;
pub mod graph;
pub mod shape;
pub mod tensor;

pub use dtype::{DType, WithDType};
pub use error::{Error, Result};
pub use graph::{
    Graph, MatmulAttrs, Node, NodeId, NodeKind, PointwiseAttrs, PointwiseMode, ReductionAttrs,
    ReductionMode,
};
pub use shape::Shape;
pub use tensor::{HostData, Location, TensorDesc};
