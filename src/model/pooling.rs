use burn::prelude::{Backend, Int};
use burn::tensor::{Tensor, TensorData};
use itertools::Itertools;

// x: nodes x batch x hidden -> batch x hidden
//
// Sums rather than averages, so the pooled magnitude grows with the number of nodes.
pub fn sum_nodes<B: Backend>(x: Tensor<B, 3>) -> Tensor<B, 2> {
    x.sum_dim(0).squeeze(0)
}

/// Sums only the first `seq_lens[b]` nodes of every batch element, skipping padded nodes.
///
/// Padded nodes still come out of `AstAttention::encode` with nonzero states, so summing over
/// every node makes the pooled vector depend on how far the batch was padded. This sum does not.
pub fn sum_real_nodes<B: Backend>(x: Tensor<B, 3>, seq_lens: &[usize]) -> Tensor<B, 2> {
    let [nodes, batch, hidden] = x.dims();
    assert_eq!(
        seq_lens.len(),
        batch,
        "expected one sequence length per batch element"
    );

    let device = x.device();
    let lens = seq_lens.iter().map(|&len| len as i64).collect_vec();

    let lens = Tensor::<B, 1, Int>::from_data(TensorData::new(lens, [batch]), &device)
        .reshape([1, batch, 1])
        .expand([nodes, batch, hidden]);
    let range = Tensor::<B, 1, Int>::arange(0..nodes as i64, &device)
        .reshape([nodes, 1, 1])
        .expand([nodes, batch, hidden]);

    sum_nodes(x.mask_fill(range.greater_equal(lens), 0.0))
}
