use burn::prelude::Backend;
use burn::tensor::Tensor;

/// A padded batch of AST node sequences ready for the encoder.
///
/// Padded nodes are hidden from the real ones by `mask`, but `AstAttention::forward` still sums
/// their states into the pooled output. Only `encode` rows `0..seq_lens[b]` are independent of
/// the padding; pool them with `pooling::sum_real_nodes`.
pub struct AstBatch<B: Backend> {
    // nodes x batch x input_size
    pub input: Tensor<B, 3>,
    // batch x nodes x nodes, additive
    pub mask: Tensor<B, 3>,
    pub seq_lens: Vec<usize>,
}

impl<B: Backend> AstBatch<B> {
    pub fn num_nodes(&self) -> usize {
        self.input.dims()[0]
    }

    pub fn batch_size(&self) -> usize {
        self.input.dims()[1]
    }
}
