// Assemble the forward and backward graph for a two-layer network and
// print every node the builders emitted. Nothing is executed — the
// printed graph is what an execution engine would compile.

use stoat_core::graph::Graph;
use stoat_core::tensor::TensorDesc;
use stoat_core::DType;
use stoat_nn::{DenseLayer, Layer};

fn main() -> stoat_core::Result<()> {
    let mut graph = Graph::new();
    let x = graph.tensor(TensorDesc::device("x", (8, 4), DType::F32));

    let mut fc1 = DenseLayer::new("fc1", 4, 6, DType::F32);
    let mut fc2 = DenseLayer::new("fc2", 6, 3, DType::F32);
    fc1.initialize_parameters_norm(1)?;
    fc2.initialize_parameters_norm(2)?;

    // Forward in network order, caching each layer's handles.
    let h = fc1.build_forward(&mut graph, x)?;
    let y = fc2.build_forward(&mut graph, h)?;

    // Backward in reverse order, threading the cached handles back in.
    let dy = graph.tensor(TensorDesc::device("dy", (8, 3), DType::F32));
    let dh = fc2.build_backward(&mut graph, dy, h, y)?;
    let _dx = fc1.build_backward(&mut graph, dh, x, h)?;

    for (i, node) in graph.nodes().iter().enumerate() {
        let desc = node.desc();
        println!(
            "#{i:2}  {:32}  {:10}  {}  {:?}",
            if desc.name().is_empty() { "<unnamed>" } else { desc.name() },
            format!("{}", desc.shape()),
            if desc.is_virtual() { "virtual" } else { "bound  " },
            node.kind(),
        );
    }
    Ok(())
}
