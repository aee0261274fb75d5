// DenseLayer — Affine transformation as graph construction
//
// The fundamental trainable layer, y = x·W + b, expressed purely as
// symbolic graph construction: build_forward and build_backward append
// operation nodes, and nothing is evaluated until an external engine
// compiles and runs the assembled graph.
//
// PARAMETER SHAPES:
//
//   weights: [in_features, out_features]
//   bias:    [out_features]
//
// and gradient accumulators of identical shape and dtype, so an
// optimizer can pair them element-for-element.
//
// BACKWARD MATH, for Y = X·W + b and incoming dY = dL/dY:
//
//   dW = Xᵗ · dY          matmul against a transposed view of X
//   db = reduce_sum(dY)   summed over the batch/leading dimensions
//   dX = dY · Wᵗ          matmul against a transposed view of W
//
// The transposes are logical views appended to the graph: the forward
// input's descriptor is never edited, so building the backward pass
// cannot corrupt the forward pass's record of the same node. dW and db
// are independent of each other; dX depends only on dY and the weight
// reference, and its handle is what the caller propagates upstream.
//
// Shape mismatches are deliberately NOT detected here — the graph
// records whatever it is asked to, and the external compile step owns
// the diagnosis.

use stoat_core::graph::{
    Graph, MatmulAttrs, NodeId, PointwiseAttrs, PointwiseMode, ReductionAttrs, ReductionMode,
};
use stoat_core::tensor::TensorDesc;
use stoat_core::{DType, Result};

use crate::init;
use crate::layer::{GradientSet, Layer, ParameterSet};

/// A trainable affine layer: `y = x·W + b`, built symbolically.
///
/// # Example
/// ```ignore
/// let mut graph = Graph::new();
/// let x = graph.tensor(TensorDesc::device("x", (8, 4), DType::F32));
/// let fc1 = DenseLayer::new("fc1", 4, 3, DType::F32);
/// let y = fc1.build_forward(&mut graph, x)?; // shape [8, 3]
/// ```
pub struct DenseLayer {
    name: String,
    in_features: usize,
    out_features: usize,
    /// Compute dtype forced onto every operation output this layer
    /// emits. May differ from the parameters' storage dtype (mixed
    /// precision); the engine honors the descriptor tags.
    dtype: DType,
    weights: TensorDesc,
    bias: TensorDesc,
    weights_grad: TensorDesc,
    bias_grad: TensorDesc,
}

impl DenseLayer {
    /// Create a dense layer with host-resident, zero-filled parameters
    /// and matching gradient accumulators.
    ///
    /// # Arguments
    /// - `name`: base name; every node this layer emits derives its
    ///   name from it
    /// - `in_features`: size of each input sample
    /// - `out_features`: size of each output sample
    /// - `dtype`: storage and compute dtype for parameters and outputs
    pub fn new(name: impl Into<String>, in_features: usize, out_features: usize, dtype: DType) -> Self {
        Self::with_param_dtype(name, in_features, out_features, dtype, dtype)
    }

    /// Like [`DenseLayer::new`], but with a parameter storage dtype that
    /// differs from the layer's compute dtype. Operation outputs are
    /// retagged to `compute_dtype`, so the matmul can run in a dtype
    /// other than the one the weights are stored in.
    pub fn with_param_dtype(
        name: impl Into<String>,
        in_features: usize,
        out_features: usize,
        compute_dtype: DType,
        param_dtype: DType,
    ) -> Self {
        let name = name.into();
        let weights = TensorDesc::host(
            format!("{name}_weights"),
            (in_features, out_features),
            param_dtype,
        );
        let bias = TensorDesc::host(format!("{name}_bias"), out_features, param_dtype);
        let weights_grad = TensorDesc::host(
            format!("{name}_weights_grad"),
            (in_features, out_features),
            param_dtype,
        );
        let bias_grad = TensorDesc::host(format!("{name}_bias_grad"), out_features, param_dtype);
        DenseLayer {
            name,
            in_features,
            out_features,
            dtype: compute_dtype,
            weights,
            bias,
            weights_grad,
            bias_grad,
        }
    }

    /// The input feature dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// The output feature dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Direct access to the weight descriptor.
    pub fn weights(&self) -> &TensorDesc {
        &self.weights
    }

    /// Direct access to the bias descriptor.
    pub fn bias(&self) -> &TensorDesc {
        &self.bias
    }
}

impl Layer for DenseLayer {
    fn name(&self) -> &str {
        &self.name
    }

    /// Forward pass: y = x·W + b.
    ///
    /// Appends a matmul of `input` against a fresh weight attribute,
    /// then a pointwise ADD of a fresh bias attribute. Both outputs are
    /// virtual, deterministically named, and retagged to the layer's
    /// compute dtype. No parameter is mutated and nothing executes.
    fn build_forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId> {
        let matmul_attrs = MatmulAttrs::new().set_compute_data_type(self.weights.data_type());
        let add_attrs = PointwiseAttrs::new()
            .set_compute_data_type(self.bias.data_type())
            .set_mode(PointwiseMode::Add);

        let weights_attr = graph.tensor(self.weights.attribute());
        let bias_attr = graph.tensor(self.bias.attribute());

        let matmul_out = graph.matmul(input, weights_attr, matmul_attrs);
        graph
            .desc_mut(matmul_out)
            .set_is_virtual(true)
            .set_name(format!("{}_weights_matmul_out", self.name))
            .set_data_type(self.dtype);

        let output = graph.pointwise(matmul_out, bias_attr, add_attrs);
        graph
            .desc_mut(output)
            .set_is_virtual(true)
            .set_name(format!("{}_bias_add_out", self.name))
            .set_data_type(self.dtype);

        Ok(output)
    }

    /// Backward pass: dW = Xᵗ·dY, db = reduce_sum(dY), dX = dY·Wᵗ.
    ///
    /// `fwd_output` is accepted for interface symmetry across layer
    /// types; the affine math never reads it.
    fn build_backward(
        &self,
        graph: &mut Graph,
        output_grad: NodeId,
        fwd_input: NodeId,
        _fwd_output: NodeId,
    ) -> Result<NodeId> {
        let matmul_attrs = MatmulAttrs::new().set_compute_data_type(self.weights_grad.data_type());

        // dW = Xᵗ · dY, via a logical-transpose view of the forward
        // input. The view is a new node; the forward descriptor stays
        // exactly as build_forward left it.
        let fwd_input_t = graph.transpose_view(fwd_input)?;
        let weights_grad_out = graph.matmul(fwd_input_t, output_grad, matmul_attrs);
        graph
            .desc_mut(weights_grad_out)
            .set_is_virtual(true)
            .set_name(format!("{}_weights_matmul_out_bwd", self.name))
            .set_data_type(self.dtype);

        // db = reduce_sum(dY) over the batch/leading dimensions.
        let reduction_attrs = ReductionAttrs::new()
            .set_compute_data_type(self.bias_grad.data_type())
            .set_mode(ReductionMode::Add);
        let bias_grad_out = graph.reduction(output_grad, reduction_attrs);
        graph
            .desc_mut(bias_grad_out)
            .set_is_virtual(true)
            .set_name(format!("{}_bias_add_out_bwd", self.name))
            .set_data_type(self.dtype);

        // dX = dY · Wᵗ, the value the preceding layer consumes.
        let weights_attr = graph.tensor(self.weights.attribute());
        let weights_t = graph.transpose_view(weights_attr)?;
        let output = graph.matmul(output_grad, weights_t, matmul_attrs);
        graph
            .desc_mut(output)
            .set_is_virtual(true)
            .set_name(format!("{}_output_bwd", self.name))
            .set_data_type(self.dtype);

        Ok(output)
    }

    fn parameters(&self) -> ParameterSet<'_> {
        ParameterSet {
            weights: &self.weights,
            bias: &self.bias,
        }
    }

    fn gradients(&self) -> GradientSet<'_> {
        GradientSet {
            weights_grad: &self.weights_grad,
            bias_grad: &self.bias_grad,
        }
    }

    /// Seed the weight buffer from a standard normal distribution.
    /// The weights must be host-resident; integer dtypes are refused.
    fn initialize_parameters_norm(&mut self, seed: u64) -> Result<()> {
        init::normal_seeded(&mut self.weights, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoat_core::graph::NodeKind;

    fn input(graph: &mut Graph, shape: impl Into<stoat_core::Shape>) -> NodeId {
        graph.tensor(TensorDesc::device("x", shape, DType::F32))
    }

    #[test]
    fn test_forward_output_shape_and_names() {
        let mut g = Graph::new();
        let x = input(&mut g, (8, 4));
        let fc1 = DenseLayer::new("fc1", 4, 3, DType::F32);

        let y = fc1.build_forward(&mut g, x).unwrap();
        let out = g.desc(y);
        assert_eq!(out.dims(), &[8, 3]);
        assert_eq!(out.data_type(), DType::F32);
        assert!(out.is_virtual());
        assert_eq!(out.name(), "fc1_bias_add_out");

        // The matmul intermediate sits right before the output and is
        // also virtual and deterministically named.
        let nodes = g.nodes();
        let mm = &nodes[nodes.len() - 2];
        assert!(matches!(mm.kind(), NodeKind::Matmul { .. }));
        assert_eq!(mm.desc().name(), "fc1_weights_matmul_out");
        assert!(mm.desc().is_virtual());
    }

    #[test]
    fn test_forward_keeps_batch_dims() {
        let mut g = Graph::new();
        let x = input(&mut g, (2, 8, 4));
        let fc1 = DenseLayer::new("fc1", 4, 3, DType::F32);
        let y = fc1.build_forward(&mut g, x).unwrap();
        assert_eq!(g.desc(y).dims(), &[2, 8, 3]);
    }

    #[test]
    fn test_backward_worked_example() {
        // in=4, out=3, batch=[8]: dY [8,3] yields dW [4,3], db [3],
        // dX [8,4].
        let mut g = Graph::new();
        let x = input(&mut g, (8, 4));
        let fc1 = DenseLayer::new("fc1", 4, 3, DType::F32);
        let y = fc1.build_forward(&mut g, x).unwrap();

        let dy = g.tensor(TensorDesc::device("dy", (8, 3), DType::F32));
        let dx = fc1.build_backward(&mut g, dy, x, y).unwrap();

        assert_eq!(g.desc(dx).dims(), &[8, 4]);
        assert_eq!(g.desc(dx).name(), "fc1_output_bwd");
        assert!(g.desc(dx).is_virtual());

        let dw = g
            .nodes()
            .iter()
            .find(|n| n.desc().name() == "fc1_weights_matmul_out_bwd")
            .unwrap();
        assert_eq!(dw.desc().dims(), &[4, 3]);

        let db = g
            .nodes()
            .iter()
            .find(|n| n.desc().name() == "fc1_bias_add_out_bwd")
            .unwrap();
        assert_eq!(db.desc().dims(), &[3]);
    }

    #[test]
    fn test_backward_leaves_forward_input_untouched() {
        let mut g = Graph::new();
        let x = input(&mut g, (8, 4));
        let fc1 = DenseLayer::new("fc1", 4, 3, DType::F32);
        let y = fc1.build_forward(&mut g, x).unwrap();
        let before = g.desc(x).clone();

        let dy = g.tensor(TensorDesc::device("dy", (8, 3), DType::F32));
        fc1.build_backward(&mut g, dy, x, y).unwrap();

        assert_eq!(g.desc(x), &before);
    }

    #[test]
    fn test_gradient_shapes_match_parameter_shapes() {
        let fc1 = DenseLayer::new("fc1", 4, 3, DType::F64);
        let params = fc1.parameters();
        let grads = fc1.gradients();
        assert_eq!(params.weights.shape(), grads.weights_grad.shape());
        assert_eq!(params.bias.shape(), grads.bias_grad.shape());
        assert_eq!(params.weights.data_type(), grads.weights_grad.data_type());
    }

    #[test]
    fn test_mixed_precision_output_dtype() {
        // Weights stored in f64, compute in f32: the forward output is
        // retagged to the layer's compute dtype, not the storage dtype.
        let mut g = Graph::new();
        let x = input(&mut g, (8, 4));
        let fc1 = DenseLayer::with_param_dtype("fc1", 4, 3, DType::F32, DType::F64);
        assert_eq!(fc1.weights().data_type(), DType::F64);

        let y = fc1.build_forward(&mut g, x).unwrap();
        assert_eq!(g.desc(y).data_type(), DType::F32);
    }

    #[test]
    fn test_accessors_are_stable() {
        let fc1 = DenseLayer::new("fc1", 4, 3, DType::F32);
        let a = fc1.parameters();
        let b = fc1.parameters();
        // Same descriptors by identity across repeated calls.
        assert!(std::ptr::eq(a.weights, b.weights));
        assert!(std::ptr::eq(a.bias, b.bias));
        assert_eq!(a.ordered().len(), 2);

        let ga = fc1.gradients();
        let gb = fc1.gradients();
        assert!(std::ptr::eq(ga.weights_grad, gb.weights_grad));
        assert!(std::ptr::eq(ga.bias_grad, gb.bias_grad));
    }
}
