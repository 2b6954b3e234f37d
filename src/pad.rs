use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::data::AstBatch;
use crate::mask::{blocked_to_additive, padding_mask};

pub enum PaddingType {
    LongestSequence,
    Explicit(usize),
}

// nodes: one feature vector per AST node
fn pad_or_trim(mut nodes: Vec<Vec<f32>>, len: usize, input_size: usize) -> (Vec<f32>, usize) {
    let kept = nodes.len().min(len);

    nodes.truncate(len);
    nodes.resize(len, vec![0.0; input_size]);

    (nodes.into_iter().flatten().collect(), kept)
}

/// Pads (or trims) every sequence to a common node count and builds the matching padding mask.
///
/// The mask stops real nodes from attending to padded ones, so `encode` rows `0..seq_len` are
/// unaffected by padding. Padded nodes still produce nonzero states that `AstAttention::forward`
/// adds to the pooled sum, so the same AST pools differently depending on the padded length.
/// Use `pooling::sum_real_nodes` with `seq_lens` for a padding-independent embedding.
///
/// Panics if a node's feature vector is not `input_size` long or if a sequence ends up without
/// any node.
pub fn pad_batch<B: Backend>(
    sequences: Vec<Vec<Vec<f32>>>,
    input_size: usize,
    padding: PaddingType,
    device: &B::Device,
) -> AstBatch<B> {
    assert!(
        sequences.iter().flatten().all(|node| node.len() == input_size),
        "every node must carry {input_size} features"
    );

    let batch = sequences.len();
    let len = match padding {
        PaddingType::Explicit(len) => len,
        PaddingType::LongestSequence => sequences.iter().map(Vec::len).max().unwrap_or(0),
    };

    let (values, seq_lens): (Vec<_>, Vec<_>) = sequences
        .into_iter()
        .map(|nodes| pad_or_trim(nodes, len, input_size))
        .unzip();

    let values = values.into_iter().flatten().collect::<Vec<_>>();

    // batch x nodes x features -> nodes x batch x features
    let input = TensorData::new(values, [batch, len, input_size]);
    let input = Tensor::<B, 3>::from_data(input, device).swap_dims(0, 1);
    let mask = blocked_to_additive(padding_mask::<B>(&seq_lens, len, device));

    AstBatch { input, mask, seq_lens }
}
