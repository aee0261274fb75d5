use crate::dtype::DType;
use crate::error::Result;
use crate::shape::Shape;
use crate::tensor::TensorDesc;

// Graph — Append-only symbolic operation registry
//
// The Graph records WHAT to compute, never computes anything itself.
// Each call that adds an operation appends a node, infers the output
// descriptor's shape from its operands, and returns a NodeId handle.
// Handles are never invalidated: nodes are appended, never removed or
// reordered, so a NodeId stays valid for the life of the graph.
//
// Example: y = x·W + b for a dense layer
//
//   let x = graph.tensor(input_desc);            // leaf
//   let w = graph.tensor(weights.attribute());   // leaf
//   let mm = graph.matmul(x, w, attrs);          // x·W
//   let y = graph.pointwise(mm, b, add_attrs);   // + b
//
// WHAT THE GRAPH DOES NOT DO:
//
// No shape validation. A matmul whose inner dimensions disagree is
// recorded as-is; the external engine that compiles the graph owns that
// diagnosis. The inference here exists so downstream construction (and
// tests) can read the geometry of every intermediate, not to reject
// malformed programs early.
//
// The one legal mutation of an existing node is through desc_mut():
// builders name, retag, and mark-virtual the outputs they just created.

/// Handle to a node in a [`Graph`].
///
/// Only minted by the graph itself; using a NodeId with a different
/// graph than the one that issued it is a logic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element-wise operation mode for [`Graph::pointwise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointwiseMode {
    #[default]
    Add,
    Mul,
}

/// Reduction mode for [`Graph::reduction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionMode {
    #[default]
    Add,
    Max,
}

// Operation attributes
//
// Each attribute struct carries the compute dtype (and mode, where one
// exists) for a single operation request. They are consuming builders:
//
//   let attrs = MatmulAttrs::new().set_compute_data_type(DType::F32);
//
// When a compute dtype is set, it is forced onto the operation's output
// descriptor; otherwise the output inherits the left operand's dtype.
// This is the hook that permits mixed-precision compute: a layer can
// run its matmul in a dtype other than the weights' storage dtype.

/// Attributes for a matrix-multiply operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatmulAttrs {
    compute_dtype: Option<DType>,
}

impl MatmulAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the operation's compute (and output) dtype.
    pub fn set_compute_data_type(mut self, dtype: DType) -> Self {
        self.compute_dtype = Some(dtype);
        self
    }
}

/// Attributes for an element-wise operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointwiseAttrs {
    compute_dtype: Option<DType>,
    mode: PointwiseMode,
}

impl PointwiseAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the operation's compute (and output) dtype.
    pub fn set_compute_data_type(mut self, dtype: DType) -> Self {
        self.compute_dtype = Some(dtype);
        self
    }

    /// Select the element-wise mode (default: Add).
    pub fn set_mode(mut self, mode: PointwiseMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Attributes for a reduction operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReductionAttrs {
    compute_dtype: Option<DType>,
    mode: ReductionMode,
}

impl ReductionAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the operation's compute (and output) dtype.
    pub fn set_compute_data_type(mut self, dtype: DType) -> Self {
        self.compute_dtype = Some(dtype);
        self
    }

    /// Select the reduction mode (default: Add).
    pub fn set_mode(mut self, mode: ReductionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// The operation that produced a node, with edges to its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A graph input or parameter attribute — no producing operation.
    Leaf,

    /// Matrix multiplication: out = lhs @ rhs.
    Matmul { lhs: NodeId, rhs: NodeId },

    /// Element-wise binary operation: out = mode(lhs, rhs).
    Pointwise {
        lhs: NodeId,
        rhs: NodeId,
        mode: PointwiseMode,
    },

    /// Reduction over the leading dimensions: out = mode-reduce(input).
    Reduction { input: NodeId, mode: ReductionMode },

    /// Logical transpose of the input's last two dimensions. A pure
    /// shape reinterpretation — the engine's matmul consumes the
    /// operand non-contiguously; no data ever moves.
    TransposeView { input: NodeId },
}

/// One node of the graph: the operation and its output descriptor.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    desc: TensorDesc,
}

impl Node {
    /// The operation that produced this node.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's output descriptor.
    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }
}

/// An append-only sequence of symbolic operation nodes.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes recorded so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in append order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node behind a handle.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The output descriptor behind a handle.
    pub fn desc(&self, id: NodeId) -> &TensorDesc {
        &self.nodes[id.0].desc
    }

    /// Mutable access to a node's output descriptor — the edit window
    /// builders use to name, retag, and mark-virtual fresh outputs.
    pub fn desc_mut(&mut self, id: NodeId) -> &mut TensorDesc {
        &mut self.nodes[id.0].desc
    }

    fn push(&mut self, kind: NodeKind, desc: TensorDesc) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { kind, desc });
        id
    }

    /// Insert a leaf node for an existing descriptor (a graph input or a
    /// parameter attribute) and return its handle.
    pub fn tensor(&mut self, desc: TensorDesc) -> NodeId {
        self.push(NodeKind::Leaf, desc)
    }

    /// Append a matrix-multiply operation.
    ///
    /// Output shape: the left operand's leading dimensions followed by
    /// the right operand's last dimension — [..., m, k] @ [..., k, n]
    /// gives [..., m, n]. Inner dimensions are not checked here.
    pub fn matmul(&mut self, lhs: NodeId, rhs: NodeId, attrs: MatmulAttrs) -> NodeId {
        let lhs_dims = self.desc(lhs).dims();
        let n = self.desc(rhs).dims().last().copied().unwrap_or(1);

        let mut dims = lhs_dims[..lhs_dims.len().saturating_sub(1)].to_vec();
        dims.push(n);

        let dtype = attrs.compute_dtype.unwrap_or(self.desc(lhs).data_type());
        let desc = TensorDesc::output(Shape::new(dims), dtype);
        self.push(NodeKind::Matmul { lhs, rhs }, desc)
    }

    /// Append an element-wise binary operation.
    ///
    /// Output shape: the left operand's shape (the right operand is
    /// broadcast by the engine where needed, e.g. a bias row).
    pub fn pointwise(&mut self, lhs: NodeId, rhs: NodeId, attrs: PointwiseAttrs) -> NodeId {
        let shape = self.desc(lhs).shape().clone();
        let dtype = attrs.compute_dtype.unwrap_or(self.desc(lhs).data_type());
        let desc = TensorDesc::output(shape, dtype);
        self.push(
            NodeKind::Pointwise {
                lhs,
                rhs,
                mode: attrs.mode,
            },
            desc,
        )
    }

    /// Append a reduction over the input's leading dimensions, keeping
    /// the last: [batch..., n] reduces to [n].
    pub fn reduction(&mut self, input: NodeId, attrs: ReductionAttrs) -> NodeId {
        let n = self.desc(input).dims().last().copied().unwrap_or(1);
        let dtype = attrs
            .compute_dtype
            .unwrap_or(self.desc(input).data_type());
        let desc = TensorDesc::output(Shape::from(n), dtype);
        self.push(
            NodeKind::Reduction {
                input,
                mode: attrs.mode,
            },
            desc,
        )
    }

    /// Append a logical-transpose view of `input`: a virtual node whose
    /// descriptor carries the source shape with its last two dimensions
    /// swapped. The source descriptor is left untouched, so forward and
    /// backward construction can never corrupt each other's view of the
    /// same node.
    pub fn transpose_view(&mut self, input: NodeId) -> Result<NodeId> {
        let src = self.desc(input);
        let shape = src.shape().transposed()?;
        let mut desc = TensorDesc::output(shape, src.data_type());
        desc.set_is_virtual(true)
            .set_name(format!("{}_t", src.name()));
        Ok(self.push(NodeKind::TransposeView { input }, desc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    fn leaf(graph: &mut Graph, name: &str, shape: impl Into<Shape>) -> NodeId {
        graph.tensor(TensorDesc::device(name, shape, DType::F32))
    }

    #[test]
    fn test_matmul_output_shape() {
        let mut g = Graph::new();
        let x = leaf(&mut g, "x", (8, 4));
        let w = leaf(&mut g, "w", (4, 3));
        let y = g.matmul(x, w, MatmulAttrs::new());
        assert_eq!(g.desc(y).dims(), &[8, 3]);
        assert_eq!(g.desc(y).data_type(), DType::F32);
    }

    #[test]
    fn test_matmul_keeps_batch_dims() {
        let mut g = Graph::new();
        let x = leaf(&mut g, "x", (2, 8, 4));
        let w = leaf(&mut g, "w", (4, 3));
        let y = g.matmul(x, w, MatmulAttrs::new());
        assert_eq!(g.desc(y).dims(), &[2, 8, 3]);
    }

    #[test]
    fn test_matmul_compute_dtype_forced() {
        let mut g = Graph::new();
        let x = leaf(&mut g, "x", (8, 4));
        let w = leaf(&mut g, "w", (4, 3));
        let y = g.matmul(x, w, MatmulAttrs::new().set_compute_data_type(DType::F64));
        assert_eq!(g.desc(y).data_type(), DType::F64);
    }

    #[test]
    fn test_pointwise_takes_lhs_shape() {
        let mut g = Graph::new();
        let a = leaf(&mut g, "a", (8, 3));
        let b = leaf(&mut g, "b", 3);
        let y = g.pointwise(a, b, PointwiseAttrs::new().set_mode(PointwiseMode::Add));
        assert_eq!(g.desc(y).dims(), &[8, 3]);
        assert!(matches!(
            g.node(y).kind(),
            NodeKind::Pointwise {
                mode: PointwiseMode::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_reduction_keeps_last_dim() {
        let mut g = Graph::new();
        let dy = leaf(&mut g, "dy", (8, 3));
        let y = g.reduction(dy, ReductionAttrs::new().set_mode(ReductionMode::Add));
        assert_eq!(g.desc(y).dims(), &[3]);
    }

    #[test]
    fn test_transpose_view_is_side_effect_free() {
        let mut g = Graph::new();
        let x = leaf(&mut g, "x", (8, 4));
        let xt = g.transpose_view(x).unwrap();

        assert_eq!(g.desc(xt).dims(), &[4, 8]);
        assert!(g.desc(xt).is_virtual());
        assert_eq!(g.desc(xt).name(), "x_t");
        // The source descriptor is untouched.
        assert_eq!(g.desc(x).dims(), &[8, 4]);
        assert!(!g.desc(x).is_virtual());
    }

    #[test]
    fn test_transpose_view_rejects_vectors() {
        let mut g = Graph::new();
        let v = leaf(&mut g, "v", 3);
        assert!(g.transpose_view(v).is_err());
    }

    #[test]
    fn test_desc_mut_edits_stick() {
        let mut g = Graph::new();
        let x = leaf(&mut g, "x", (8, 4));
        let w = leaf(&mut g, "w", (4, 3));
        let y = g.matmul(x, w, MatmulAttrs::new());
        g.desc_mut(y)
            .set_is_virtual(true)
            .set_name("fc1_weights_matmul_out");
        assert!(g.desc(y).is_virtual());
        assert_eq!(g.desc(y).name(), "fc1_weights_matmul_out");
    }

    #[test]
    fn test_append_only() {
        let mut g = Graph::new();
        assert!(g.is_empty());
        let x = leaf(&mut g, "x", (8, 4));
        let w = leaf(&mut g, "w", (4, 3));
        let before = g.desc(x).clone();
        let _ = g.matmul(x, w, MatmulAttrs::new());
        assert_eq!(g.len(), 3);
        // Earlier handles still resolve to unchanged descriptors.
        assert_eq!(g.desc(x), &before);
    }
}
