// Layer trait — The interface every graph-building layer implements
//
// A layer here does not compute anything. It appends operations to a
// Graph — once for the forward pass, once (in reverse network order)
// for the backward pass — and owns the descriptors for its learnable
// state. The orchestrator drives layers through this trait:
//
//   1. build_forward for each layer, in network order
//   2. build_backward for each layer, in reverse order, threading each
//      layer's cached forward input/output handles back in
//   3. hand the assembled graph to the execution engine
//
// WHY A TRAIT?
//
// The affine layer is the only implementor in this crate, but the
// orchestrator should not care which layer type it is driving. That is
// also why build_backward accepts the forward *output* handle: the
// affine math never reads it, but activation-style layers do, and the
// seam has to fit them all.

use stoat_core::graph::{Graph, NodeId};
use stoat_core::tensor::TensorDesc;
use stoat_core::Result;

/// The learnable parameters of a layer, in fixed order, as named
/// borrowed references. Callers never take ownership.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSet<'a> {
    pub weights: &'a TensorDesc,
    pub bias: &'a TensorDesc,
}

impl<'a> ParameterSet<'a> {
    /// The descriptors in their fixed order: weights, then bias.
    pub fn ordered(&self) -> [&'a TensorDesc; 2] {
        [self.weights, self.bias]
    }
}

/// The gradient accumulators of a layer, in the same fixed order as
/// [`ParameterSet`].
#[derive(Debug, Clone, Copy)]
pub struct GradientSet<'a> {
    pub weights_grad: &'a TensorDesc,
    pub bias_grad: &'a TensorDesc,
}

impl<'a> GradientSet<'a> {
    /// The descriptors in their fixed order: weights grad, then bias grad.
    pub fn ordered(&self) -> [&'a TensorDesc; 2] {
        [self.weights_grad, self.bias_grad]
    }
}

/// The contract between a layer and the surrounding training loop.
pub trait Layer {
    /// The layer's name, used to derive deterministic node names.
    fn name(&self) -> &str;

    /// Append this layer's forward subgraph, consuming `input` and
    /// returning the handle of the layer's output node.
    fn build_forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId>;

    /// Append this layer's backward subgraph.
    ///
    /// `output_grad` is the incoming gradient of the loss with respect
    /// to this layer's output; `fwd_input` and `fwd_output` are the
    /// handles cached from the forward pass. Returns the handle of the
    /// input-gradient node, to be propagated into the preceding layer.
    fn build_backward(
        &self,
        graph: &mut Graph,
        output_grad: NodeId,
        fwd_input: NodeId,
        fwd_output: NodeId,
    ) -> Result<NodeId>;

    /// Borrowed views of the learnable parameters, in fixed order.
    fn parameters(&self) -> ParameterSet<'_>;

    /// Borrowed views of the gradient accumulators, in fixed order.
    fn gradients(&self) -> GradientSet<'_>;

    /// Seed the layer's host-resident parameters from a standard normal
    /// distribution using a deterministic generator.
    fn initialize_parameters_norm(&mut self, seed: u64) -> Result<()>;
}
